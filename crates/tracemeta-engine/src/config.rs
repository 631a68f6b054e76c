//! Engine configuration

use crate::clock::NS_PER_S;

/// Memory engine configuration
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Maximum number of live objects; allocations beyond it fail with a
    /// memory error. `None` means unlimited.
    pub max_objects: Option<usize>,
    /// Frequency (Hz) of newly created clock classes
    pub default_frequency: u64,
    /// Whether newly created clock classes have the Unix epoch as origin
    pub default_origin_is_unix_epoch: bool,
    /// Freeze objects once they become part of a used hierarchy (clock
    /// class set as a default clock class, stream class with streams or
    /// event classes, trace class with traces, attached field classes)
    pub freeze_on_attach: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_objects: None,
            default_frequency: NS_PER_S,
            default_origin_is_unix_epoch: true,
            freeze_on_attach: true,
        }
    }
}

impl EngineConfig {
    /// Configuration with an allocation limit
    pub fn with_max_objects(max_objects: usize) -> Self {
        EngineConfig {
            max_objects: Some(max_objects),
            ..Default::default()
        }
    }
}
