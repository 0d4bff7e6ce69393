use serde::{Deserialize, Serialize};

/// The acting user, passed explicitly into every operation instead of being
/// looked up from ambient authentication state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub name: String,
    pub email: String,
}
