//! Logging abstraction
//!
//! Unified logging macros that work across targets:
//! - Embedded (`defmt` feature): formatted on the target, sent through defmt
//! - Host tests: `println!` with a level prefix
//! - Host non-test: no-op
//!
//! Messages are formatted into a fixed-size buffer before they reach
//! defmt, so any `Display` argument can be logged without a defmt
//! `Format` impl. Text beyond [`LOG_MSG_SIZE`](crate::log_buffer::LOG_MSG_SIZE)
//! bytes is cut off.

/// Format into a stack buffer and hand it to defmt at the given level.
#[cfg(feature = "defmt")]
#[doc(hidden)]
#[macro_export]
macro_rules! __log_defmt {
    ($level:ident, $($arg:tt)*) => {{
        let mut buf = ::heapless::String::<{ $crate::log_buffer::LOG_MSG_SIZE }>::new();
        $crate::log_buffer::write_truncated(&mut buf, ::core::format_args!($($arg)*));
        ::defmt::$level!("{=str}", buf.as_str());
    }};
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        $crate::__log_defmt!(info, $($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        println!("[INFO] {}", format!($($arg)*));

        #[cfg(all(not(feature = "defmt"), not(test)))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        $crate::__log_defmt!(warn, $($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        println!("[WARN] {}", format!($($arg)*));

        #[cfg(all(not(feature = "defmt"), not(test)))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        $crate::__log_defmt!(error, $($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        eprintln!("[ERROR] {}", format!($($arg)*));

        #[cfg(all(not(feature = "defmt"), not(test)))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        $crate::__log_defmt!(debug, $($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        println!("[DEBUG] {}", format!($($arg)*));

        #[cfg(all(not(feature = "defmt"), not(test)))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}

/// Log trace message
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        $crate::__log_defmt!(trace, $($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        println!("[TRACE] {}", format!($($arg)*));

        #[cfg(all(not(feature = "defmt"), not(test)))]
        {
            let _ = ::core::format_args!($($arg)*);
        }
    }};
}
