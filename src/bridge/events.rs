/// Lifecycle notifications delivered by the host runtime, one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The host environment finished initializing.
    Ready,
    /// The watch app asked to show its settings UI.
    ShowConfiguration,
    /// The configuration page closed, handing back its serialized result.
    WebviewClosed { response: String },
}
