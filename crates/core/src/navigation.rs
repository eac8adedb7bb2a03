//! Progressive section navigation.
//!
//! Sections unlock one at a time. While the user has never gone back, completing the
//! current section moves them on automatically. Once they have gone back, forward
//! movement only happens through an explicit [`NavigationState::next_section`] call so
//! that editing an earlier section does not pull them away from it.

use serde::Serialize;

use crate::completion::{is_section_complete, missing_required};
use crate::error::NavigationError;
use crate::form::{FormData, Section};
use crate::reducer::FormErrors;

/// Section that should be shown after the latest state change.
///
/// Advances at most one step per call.
pub fn next_visible_section(
    data: &FormData,
    errors: &FormErrors,
    current: Section,
    has_navigated_back: bool,
) -> Section {
    if has_navigated_back || !is_section_complete(current, data, errors) {
        return current;
    }
    current.next().unwrap_or(current)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub current: Section,
    pub has_navigated_back: bool,
    /// Furthest section reached so far; everything up to it is rendered.
    pub highest_unlocked: Section,
    pub submitted: bool,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            current: Section::ServiceUser,
            has_navigated_back: false,
            highest_unlocked: Section::ServiceUser,
            submitted: false,
        }
    }
}

impl NavigationState {
    /// Re-evaluate auto-advance after a state change.
    ///
    /// Keeps stepping while the section just reached is already complete, so filling
    /// an earlier section last can carry the form straight to the final section.
    pub fn recompute(&mut self, data: &FormData, errors: &FormErrors) {
        if self.submitted {
            return;
        }
        loop {
            let next = next_visible_section(data, errors, self.current, self.has_navigated_back);
            if next == self.current {
                break;
            }
            tracing::debug!("auto-advancing from {} to {}", self.current, next);
            self.move_to(next);
        }
    }

    /// True once the final section has been reached, which is where submitting happens.
    pub fn can_submit(&self) -> bool {
        !self.submitted && self.highest_unlocked == Section::MedicalBackground
    }

    /// Step back one section. Returns false when already at the first section.
    pub fn go_back(&mut self) -> bool {
        match self.current.previous() {
            Some(previous) if !self.submitted => {
                self.current = previous;
                self.has_navigated_back = true;
                true
            }
            _ => false,
        }
    }

    /// Explicit "Next Section" action.
    ///
    /// # Errors
    /// Fails if the current section is incomplete, if it is the last section, or if the
    /// form has been submitted.
    pub fn next_section(
        &mut self,
        data: &FormData,
        errors: &FormErrors,
    ) -> Result<Section, NavigationError> {
        if self.submitted {
            return Err(NavigationError::AlreadySubmitted);
        }
        let missing = missing_required(self.current, data, errors);
        if !missing.is_empty() {
            return Err(NavigationError::SectionIncomplete {
                section: self.current,
                missing: missing.len(),
            });
        }
        let next = self
            .current
            .next()
            .ok_or(NavigationError::NoNextSection(self.current))?;
        self.move_to(next);
        Ok(next)
    }

    /// Sections to render, in order. Earlier sections stay visible once unlocked.
    pub fn visible_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| *s <= self.highest_unlocked)
            .collect()
    }

    pub fn is_active(&self, section: Section) -> bool {
        self.current == section
    }

    pub(crate) fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    fn move_to(&mut self, section: Section) {
        self.current = section;
        self.highest_unlocked = self.highest_unlocked.max(section);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::tests::{complete_next_of_kin, complete_service_user};

    #[test]
    fn auto_advances_from_complete_first_section() {
        let mut data = FormData::default();
        complete_service_user(&mut data);
        assert_eq!(
            next_visible_section(&data, &FormErrors::new(), Section::ServiceUser, false),
            Section::NextOfKin
        );
    }

    #[test]
    fn stays_put_after_navigating_back() {
        let mut data = FormData::default();
        complete_service_user(&mut data);
        assert_eq!(
            next_visible_section(&data, &FormErrors::new(), Section::ServiceUser, true),
            Section::ServiceUser
        );
    }

    #[test]
    fn stays_put_while_incomplete_and_never_passes_last_section() {
        let data = FormData::default();
        assert_eq!(
            next_visible_section(&data, &FormErrors::new(), Section::ServiceUser, false),
            Section::ServiceUser
        );
        let full = crate::completion::tests::complete_form();
        assert_eq!(
            next_visible_section(&full, &FormErrors::new(), Section::MedicalBackground, false),
            Section::MedicalBackground
        );
    }

    #[test]
    fn recompute_cascades_through_already_complete_sections() {
        let mut data = FormData::default();
        complete_next_of_kin(&mut data);
        let errors = FormErrors::new();

        let mut nav = NavigationState::default();
        nav.recompute(&data, &errors);
        assert_eq!(nav.current, Section::ServiceUser);
        assert!(!nav.can_submit());

        complete_service_user(&mut data);
        assert_eq!(
            next_visible_section(&data, &errors, Section::ServiceUser, false),
            Section::NextOfKin
        );
        nav.recompute(&data, &errors);
        assert_eq!(nav.current, Section::MedicalBackground);
        assert_eq!(nav.visible_sections(), Section::ALL.to_vec());
        assert!(nav.can_submit());
    }

    #[test]
    fn going_back_keeps_sections_unlocked_and_disables_auto_advance() {
        let mut data = FormData::default();
        complete_service_user(&mut data);
        let errors = FormErrors::new();

        let mut nav = NavigationState::default();
        nav.recompute(&data, &errors);
        assert!(nav.go_back());
        assert_eq!(nav.current, Section::ServiceUser);
        assert!(nav.has_navigated_back);
        assert_eq!(nav.highest_unlocked, Section::NextOfKin);
        assert!(!nav.go_back());

        nav.recompute(&data, &errors);
        assert_eq!(nav.current, Section::ServiceUser);
        assert!(nav.is_active(Section::ServiceUser));
        assert_eq!(
            nav.visible_sections(),
            vec![Section::ServiceUser, Section::NextOfKin]
        );

        assert_eq!(nav.next_section(&data, &errors), Ok(Section::NextOfKin));
    }

    #[test]
    fn explicit_next_requires_complete_section() {
        let data = FormData::default();
        let mut nav = NavigationState::default();
        assert_eq!(
            nav.next_section(&data, &FormErrors::new()),
            Err(NavigationError::SectionIncomplete {
                section: Section::ServiceUser,
                missing: 11
            })
        );

        let full = crate::completion::tests::complete_form();
        nav.current = Section::MedicalBackground;
        assert_eq!(
            nav.next_section(&full, &FormErrors::new()),
            Err(NavigationError::NoNextSection(Section::MedicalBackground))
        );
    }
}
