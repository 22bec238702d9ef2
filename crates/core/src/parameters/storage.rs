//! Parameter store
//!
//! Name to value map loaded once at startup. Subsystems register their
//! defaults, the host overrides values, then each subsystem reads a typed
//! snapshot with `from_store`.

use super::error::ParameterError;
use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters (power of two)
pub const MAX_PARAMS: usize = 32;

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Not listed by `iter_names`
        const HIDDEN = 0b00000001;
        /// Rejected by `set`
        const READ_ONLY = 0b00000010;
    }
}

/// Parameter value types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl ParamValue {
    fn same_type(&self, other: &ParamValue) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    /// Numeric view; `Bool` maps to 0 or 1.
    pub fn as_f32(&self) -> f32 {
        match *self {
            ParamValue::Bool(b) => b as u8 as f32,
            ParamValue::Int(v) => v as f32,
            ParamValue::Float(v) => v,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    value: ParamValue,
    flags: ParamFlags,
}

type Key = String<PARAM_NAME_LEN>;

fn key(name: &str) -> Result<Key, ParameterError> {
    let mut key = Key::new();
    key.push_str(name).map_err(|_| ParameterError::NameTooLong)?;
    Ok(key)
}

/// Parameter store
pub struct ParameterStore {
    entries: FnvIndexMap<Key, Entry, MAX_PARAMS>,
    dirty: bool,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self {
            entries: FnvIndexMap::new(),
            dirty: false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        let key = key(name).ok()?;
        self.entries.get(&key).map(|e| &e.value)
    }

    /// Overwrite a registered parameter.
    ///
    /// `Int` values are accepted for `Float` parameters.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let key = key(name)?;
        let entry = self.entries.get_mut(&key).ok_or(ParameterError::Unknown)?;
        if entry.flags.contains(ParamFlags::READ_ONLY) {
            return Err(ParameterError::ReadOnly);
        }

        entry.value = match (entry.value, value) {
            (ParamValue::Float(_), ParamValue::Int(v)) => ParamValue::Float(v as f32),
            (current, new) if current.same_type(&new) => new,
            _ => return Err(ParameterError::TypeMismatch),
        };
        self.dirty = true;
        Ok(())
    }

    /// Register a parameter with its default value.
    ///
    /// Registering an existing name keeps the current value.
    pub fn register(
        &mut self,
        name: &str,
        default_value: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        let key = key(name)?;
        if self.entries.contains_key(&key) {
            return Ok(());
        }

        self.entries
            .insert(
                key,
                Entry {
                    value: default_value,
                    flags,
                },
            )
            .map_err(|_| ParameterError::StoreFull)?;
        Ok(())
    }

    pub fn is_hidden(&self, name: &str) -> bool {
        key(name)
            .ok()
            .and_then(|k| self.entries.get(&k))
            .is_some_and(|e| e.flags.contains(ParamFlags::HIDDEN))
    }

    /// Names of all visible parameters
    pub fn iter_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, e)| !e.flags.contains(ParamFlags::HIDDEN))
            .map(|(k, _)| k.as_str())
    }

    /// Total parameter count, hidden included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once any value has been changed with `set`
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}
