/// Lifecycle steps reported by the render surface.
///
/// The surface fires them in the order `InBegin -> InComplete -> OutBegin -> OutComplete`;
/// a plain send stops after `InComplete`, a clear only fires the `Out*` pair.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Step {
    InBegin,
    InComplete,
    OutBegin,
    OutComplete,
}

impl Step {
    pub const fn id(self) -> u8 {
        match self {
            Step::InBegin => 1,
            Step::InComplete => 2,
            Step::OutBegin => 3,
            Step::OutComplete => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Step::InBegin => "in-begin",
            Step::InComplete => "in-complete",
            Step::OutBegin => "out-begin",
            Step::OutComplete => "out-complete",
        }
    }
}

pub const ALL_STEPS: [Step; 4] = [
    Step::InBegin,
    Step::InComplete,
    Step::OutBegin,
    Step::OutComplete,
];
