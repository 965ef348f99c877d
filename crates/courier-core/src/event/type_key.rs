// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A process-stable identifier for an event type.
///
/// Two keys are equal if and only if they were derived from the same Rust
/// type. Equality, ordering and hashing only look at the underlying
/// [`TypeId`]; the type name is carried along for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key of the event type `E`.
    #[must_use]
    pub fn of<E: 'static>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: std::any::type_name::<E>(),
        }
    }

    /// Returns the underlying [`TypeId`].
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Returns the fully qualified name of the event type.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Resized;
    struct Closed;

    #[test]
    fn test_same_type_same_key() {
        assert_eq!(TypeKey::of::<Resized>(), TypeKey::of::<Resized>());
        assert_eq!(TypeKey::of::<u32>().type_id(), TypeId::of::<u32>());
    }

    #[test]
    fn test_different_types_different_keys() {
        assert_ne!(TypeKey::of::<Resized>(), TypeKey::of::<Closed>());
        // Aliases are the same type, distinct wrappers are not.
        type Alias = Resized;
        assert_eq!(TypeKey::of::<Alias>(), TypeKey::of::<Resized>());
        assert_ne!(TypeKey::of::<u32>(), TypeKey::of::<i32>());
    }

    #[test]
    fn test_usable_as_hash_key() {
        let mut keys = HashSet::new();
        keys.insert(TypeKey::of::<Resized>());
        keys.insert(TypeKey::of::<Closed>());
        keys.insert(TypeKey::of::<Resized>());
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_name_is_reported() {
        let key = TypeKey::of::<Resized>();
        assert!(key.name().ends_with("Resized"));
        assert_eq!(key.to_string(), key.name());
    }
}
