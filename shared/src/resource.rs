//! Resource contract
//!
//! Every HR entity managed by a store implements [`Resource`]. The trait only
//! carries what the generic store needs: where the entity lives on the REST
//! API, which push event announces its changes, and how to read its id.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A backend-owned record with an opaque string id.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// REST path segment (`/api/{NAME}`)
    const NAME: &'static str;

    /// Push channel event name (`{entity}Changed`)
    const EVENT: &'static str;

    /// Creation payload accepted by `POST /api/{NAME}`
    type Create: Serialize + Send + Sync;

    /// Backend-assigned id, immutable after creation
    fn id(&self) -> &str;
}

/// Dropdown option built from another store's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Implements [`Resource`] for a model whose id lives in an `id: String` field.
#[macro_export]
macro_rules! impl_resource {
    ($ty:ty, $create:ty, $name:literal, $event:literal) => {
        impl $crate::resource::Resource for $ty {
            const NAME: &'static str = $name;
            const EVENT: &'static str = $event;
            type Create = $create;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}
