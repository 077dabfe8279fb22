/// Presentation phases of one output target.
///
/// Stable (idle) phases:
/// - Clear, Showing
///
/// Transition (animating or timed) phases:
/// - Entering, Holding, Exiting
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Phase {
    // Stable
    #[default]
    Clear,
    Showing,

    // Transition
    Entering,
    Holding,
    Exiting,
}

/// Internal, compact IDs used for error payloads and notices.
impl Phase {
    pub const fn id(self) -> u8 {
        match self {
            Phase::Clear => 0,
            Phase::Showing => 1,
            Phase::Entering => 10,
            Phase::Holding => 11,
            Phase::Exiting => 12,
        }
    }

    /// True for the phases in which a differing-geometry request must wait.
    pub const fn blocks_resize(self) -> bool {
        matches!(self, Phase::Entering | Phase::Holding)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Phase::Clear => "Clear",
            Phase::Showing => "Showing",
            Phase::Entering => "Entering",
            Phase::Holding => "Holding",
            Phase::Exiting => "Exiting",
        }
    }
}

/// Canonical list of all phases (stable + transition).
pub const ALL_PHASES: [Phase; 5] = [
    Phase::Clear,
    Phase::Showing,
    Phase::Entering,
    Phase::Holding,
    Phase::Exiting,
];
