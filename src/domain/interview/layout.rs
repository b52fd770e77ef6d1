//! Section visibility, derived from the phase

use super::phase::PhaseState;

/// Top-level screen section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Start,
    Interview,
    Result,
}

/// What the view should show for a given phase.
///
/// Pure projection of [`PhaseState`]; views never keep their own notion of phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub section: Section,
    pub next_control: bool,
    pub capture_preview: bool,
}

impl Layout {
    pub const fn for_phase(phase: PhaseState) -> Self {
        match phase {
            PhaseState::Idle => Self {
                section: Section::Start,
                next_control: false,
                capture_preview: false,
            },
            PhaseState::AwaitingQuestion => Self {
                section: Section::Interview,
                next_control: false,
                capture_preview: false,
            },
            // Visible but not honored while preparing
            PhaseState::Preparing => Self {
                section: Section::Interview,
                next_control: true,
                capture_preview: false,
            },
            PhaseState::Recording => Self {
                section: Section::Interview,
                next_control: false,
                capture_preview: true,
            },
            PhaseState::Processing => Self {
                section: Section::Result,
                next_control: false,
                capture_preview: false,
            },
            PhaseState::AwaitingNext => Self {
                section: Section::Result,
                next_control: true,
                capture_preview: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_shows_start_section_only() {
        let layout = Layout::for_phase(PhaseState::Idle);
        assert_eq!(layout.section, Section::Start);
        assert!(!layout.next_control);
        assert!(!layout.capture_preview);
    }

    #[test]
    fn next_control_hidden_while_recording() {
        assert!(Layout::for_phase(PhaseState::Preparing).next_control);
        assert!(!Layout::for_phase(PhaseState::Recording).next_control);
        assert!(Layout::for_phase(PhaseState::AwaitingNext).next_control);
    }

    #[test]
    fn capture_preview_only_while_recording() {
        for phase in [
            PhaseState::Idle,
            PhaseState::AwaitingQuestion,
            PhaseState::Preparing,
            PhaseState::Processing,
            PhaseState::AwaitingNext,
        ] {
            assert!(!Layout::for_phase(phase).capture_preview, "{phase}");
        }
        assert!(Layout::for_phase(PhaseState::Recording).capture_preview);
    }

    #[test]
    fn results_shown_after_recording() {
        assert_eq!(Layout::for_phase(PhaseState::Processing).section, Section::Result);
        assert_eq!(Layout::for_phase(PhaseState::AwaitingNext).section, Section::Result);
    }
}
