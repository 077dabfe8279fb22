use crate::event::{EventKind, ALL_EVENT_KINDS};

use super::{advance, Phase, Step, ALL_PHASES, ALL_STEPS};

/// Phase graph derived from the phase table.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PhaseGraph {
    pub phases: Vec<Phase>,
    pub edges: Vec<PhaseEdge>,
}

/// Directed edge: `from --step(kind)--> to`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PhaseEdge {
    pub from: Phase,
    pub step: Step,
    pub kind: EventKind,
    pub to: Phase,
}

/// Build the canonical phase graph by probing every (phase, step, kind).
pub fn phase_graph() -> PhaseGraph {
    let mut edges = Vec::new();

    for from in ALL_PHASES {
        for step in ALL_STEPS {
            for kind in ALL_EVENT_KINDS {
                if let Ok(to) = advance(from, step, kind) {
                    edges.push(PhaseEdge {
                        from,
                        step,
                        kind,
                        to,
                    });
                }
            }
        }
    }

    PhaseGraph {
        phases: ALL_PHASES.to_vec(),
        edges,
    }
}

impl PhaseGraph {
    /// Phases reachable from `from` in one step.
    pub fn successors(&self, from: Phase) -> Vec<Phase> {
        let mut out: Vec<Phase> = Vec::new();
        for edge in self.edges.iter().filter(|e| e.from == from) {
            if !out.contains(&edge.to) {
                out.push(edge.to);
            }
        }
        out
    }
}
