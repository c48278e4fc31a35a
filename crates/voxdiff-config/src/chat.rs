use serde::Deserialize;

/// Chat endpoint configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Response shape sent back to the editor
    #[serde(default)]
    pub protocol: ChatProtocol,
}

/// Wire shape of `POST /chat` responses
///
/// The editor must be built against the selected version; the two shapes
/// are not interchangeable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatProtocol {
    /// Flat `modified_code` plus synthesized audio
    #[default]
    Voice,
    /// `proposed_patch` object and `apply_label`, text only
    Patch,
}

impl ChatProtocol {
    /// Whether replies in this protocol carry synthesized speech
    pub const fn speaks(self) -> bool {
        matches!(self, Self::Voice)
    }
}
