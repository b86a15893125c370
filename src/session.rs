//! Per-session mutable state: the current style selections, the uploaded
//! image(s), the request lifecycle status, and the last generation result.
//!
//! All mutation happens on action boundaries (upload, select, submit); there
//! is a single owner and no concurrent writers.

use anyhow::{anyhow, bail, Result};
use chrono::Utc;

use crate::catalog::{
    self, HairColor, StyleOption, ANCIENT_CLOTHING_ID, CLOTHING_STYLES, EARRING_STYLES,
    EXPRESSION_STYLES, FRINGE_STYLES, GESTURE_STYLES, HAIR_COLORS, MAKEUP_STYLES,
};
use crate::llm::gemini::GeneratedImage;
use crate::llm::media::PortraitImage;

/// Derived styling mode, computed once from the clothing selection and
/// threaded into the prompt compiler and the enable/disable surface.
///
/// In ancient-theme mode the individually selected hair, makeup, accessory,
/// gesture-adjacent fragments stay selected in state but are excluded from
/// compilation in favor of a single creative-freedom instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StylingMode {
    AncientTheme,
    Individual,
}

impl StylingMode {
    pub fn is_ancient(self) -> bool {
        matches!(self, StylingMode::AncientTheme)
    }
}

/// Request lifecycle status. Transitions strictly
/// Idle/Error/Success -> Generating -> Success or Error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Generating,
    Success,
    Error,
}

/// One chosen option per category plus the cap flag. Exactly one option is
/// selected per category at all times; defaults are pre-selected at
/// initialization and selections persist across generations.
#[derive(Debug, Clone, Copy)]
pub struct SelectionState {
    pub hair_color: &'static HairColor,
    pub fringe: &'static StyleOption,
    pub makeup: &'static StyleOption,
    pub clothing: &'static StyleOption,
    pub earrings: &'static StyleOption,
    pub gesture: &'static StyleOption,
    pub expression: &'static StyleOption,
    pub has_cap: bool,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            hair_color: &HAIR_COLORS[0],
            fringe: &FRINGE_STYLES[0],
            makeup: &MAKEUP_STYLES[0],
            clothing: &CLOTHING_STYLES[0],
            earrings: &EARRING_STYLES[0],
            // Beckoning and sexy are the studio's starting look.
            gesture: &GESTURE_STYLES[5],
            expression: &EXPRESSION_STYLES[2],
            has_cap: false,
        }
    }
}

fn pick(
    options: &'static [StyleOption],
    category: &str,
    id: &str,
) -> Result<&'static StyleOption> {
    catalog::find_style(options, id).ok_or_else(|| {
        anyhow!(
            "Unknown {category} '{id}' (expected one of: {})",
            catalog::style_ids(options).join(", ")
        )
    })
}

impl SelectionState {
    pub fn styling_mode(&self) -> StylingMode {
        if self.clothing.id == ANCIENT_CLOTHING_ID {
            StylingMode::AncientTheme
        } else {
            StylingMode::Individual
        }
    }

    pub fn select_hair_color(&mut self, id: &str) -> Result<()> {
        self.hair_color = catalog::find_hair_color(id).ok_or_else(|| {
            anyhow!(
                "Unknown hair color '{id}' (expected one of: {})",
                catalog::hair_color_ids().join(", ")
            )
        })?;
        Ok(())
    }

    pub fn select_fringe(&mut self, id: &str) -> Result<()> {
        self.fringe = pick(FRINGE_STYLES, "fringe style", id)?;
        Ok(())
    }

    pub fn select_makeup(&mut self, id: &str) -> Result<()> {
        self.makeup = pick(MAKEUP_STYLES, "makeup style", id)?;
        Ok(())
    }

    pub fn select_clothing(&mut self, id: &str) -> Result<()> {
        self.clothing = pick(CLOTHING_STYLES, "clothing style", id)?;
        Ok(())
    }

    pub fn select_earrings(&mut self, id: &str) -> Result<()> {
        self.earrings = pick(EARRING_STYLES, "earring style", id)?;
        Ok(())
    }

    pub fn select_gesture(&mut self, id: &str) -> Result<()> {
        self.gesture = pick(GESTURE_STYLES, "gesture", id)?;
        Ok(())
    }

    pub fn select_expression(&mut self, id: &str) -> Result<()> {
        self.expression = pick(EXPRESSION_STYLES, "expression", id)?;
        Ok(())
    }
}

/// A finished generation: the styled image and the input it came from, both
/// as self-contained data URIs for side-by-side display, plus a timestamp.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub image_url: String,
    pub original_url: String,
    pub timestamp: i64,
}

/// The studio session: selection state, uploaded images, lifecycle status,
/// and the last result. Held until replaced by the next generation or
/// discarded on a new primary upload.
#[derive(Debug)]
pub struct StudioSession {
    pub selection: SelectionState,
    status: SessionStatus,
    error: Option<String>,
    primary: Option<PortraitImage>,
    smile_reference: Option<PortraitImage>,
    result: Option<GenerationResult>,
}

impl Default for StudioSession {
    fn default() -> Self {
        Self::new()
    }
}

impl StudioSession {
    pub fn new() -> Self {
        Self {
            selection: SelectionState::default(),
            status: SessionStatus::Idle,
            error: None,
            primary: None,
            smile_reference: None,
            result: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    pub fn primary_image(&self) -> Option<&PortraitImage> {
        self.primary.as_ref()
    }

    /// Replaces the reference portrait. The previous result and error are
    /// discarded; selections are kept.
    pub fn set_primary_image(&mut self, image: PortraitImage) {
        self.primary = Some(image);
        self.result = None;
        self.error = None;
        self.status = SessionStatus::Idle;
    }

    pub fn set_smile_reference(&mut self, image: PortraitImage) {
        self.smile_reference = Some(image);
        self.error = None;
    }

    /// The smile reference, but only when it actually participates in the
    /// request: smile expression selected and ancient mode inactive.
    pub fn active_smile_reference(&self) -> Option<&PortraitImage> {
        if self.selection.styling_mode().is_ancient() || self.selection.expression.id != "smile" {
            return None;
        }
        self.smile_reference.as_ref()
    }

    pub fn begin_generation(&mut self) -> Result<()> {
        if self.primary.is_none() {
            bail!("No reference portrait has been uploaded");
        }
        if self.status() == SessionStatus::Generating {
            bail!("A generation is already in flight");
        }
        self.status = SessionStatus::Generating;
        self.error = None;
        Ok(())
    }

    pub fn complete_generation(&mut self, image: &GeneratedImage) -> Result<()> {
        let Some(primary) = &self.primary else {
            bail!("Cannot record a result without a reference portrait");
        };
        self.result = Some(GenerationResult {
            image_url: image.to_data_uri(),
            original_url: primary.to_data_uri(),
            timestamp: Utc::now().timestamp_millis(),
        });
        self.status = SessionStatus::Success;
        self.error = None;
        Ok(())
    }

    /// Records a failure. The stale result is deliberately kept so the user
    /// can retry without re-uploading.
    pub fn fail_generation(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.status = SessionStatus::Error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portrait() -> PortraitImage {
        PortraitImage {
            bytes: vec![0x89, 0x50, 0x4E, 0x47],
            mime_type: "image/png".to_string(),
        }
    }

    fn generated() -> GeneratedImage {
        GeneratedImage {
            bytes: vec![1, 2, 3],
            mime_type: "image/png".to_string(),
        }
    }

    #[test]
    fn defaults_match_the_studio_starting_look() {
        let selection = SelectionState::default();
        assert_eq!(selection.hair_color.id, "silver");
        assert_eq!(selection.fringe.id, "auto");
        assert_eq!(selection.makeup.id, "none");
        assert_eq!(selection.clothing.id, "tshirt");
        assert_eq!(selection.earrings.id, "none");
        assert_eq!(selection.gesture.id, "beckoning");
        assert_eq!(selection.expression.id, "sexy");
        assert!(!selection.has_cap);
        assert_eq!(selection.styling_mode(), StylingMode::Individual);
    }

    #[test]
    fn ancient_clothing_switches_the_styling_mode() {
        let mut selection = SelectionState::default();
        selection.select_clothing("ancient").unwrap();
        assert!(selection.styling_mode().is_ancient());
        selection.select_clothing("hoodie").unwrap();
        assert_eq!(selection.styling_mode(), StylingMode::Individual);
    }

    #[test]
    fn unknown_option_id_is_rejected_with_the_valid_ids() {
        let mut selection = SelectionState::default();
        let err = selection.select_expression("grimace").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("grimace"));
        assert!(message.contains("smile"));
    }

    #[test]
    fn smile_reference_only_applies_with_smile_expression_outside_ancient_mode() {
        let mut session = StudioSession::new();
        session.set_smile_reference(portrait());
        assert!(session.active_smile_reference().is_none());

        session.selection.select_expression("smile").unwrap();
        assert!(session.active_smile_reference().is_some());

        session.selection.select_clothing("ancient").unwrap();
        assert!(session.active_smile_reference().is_none());
    }

    #[test]
    fn generation_requires_a_primary_image() {
        let mut session = StudioSession::new();
        assert!(session.begin_generation().is_err());
        session.set_primary_image(portrait());
        assert!(session.begin_generation().is_ok());
        assert_eq!(session.status(), SessionStatus::Generating);
    }

    #[test]
    fn a_second_submit_is_rejected_while_generating() {
        let mut session = StudioSession::new();
        session.set_primary_image(portrait());
        session.begin_generation().unwrap();
        assert!(session.begin_generation().is_err());
    }

    #[test]
    fn success_records_a_result_and_clears_the_error() {
        let mut session = StudioSession::new();
        session.set_primary_image(portrait());
        session.begin_generation().unwrap();
        session.complete_generation(&generated()).unwrap();
        assert_eq!(session.status(), SessionStatus::Success);
        let result = session.result().unwrap();
        assert!(result.image_url.starts_with("data:image/png;base64,"));
        assert!(result.original_url.starts_with("data:image/png;base64,"));
        assert!(result.timestamp > 0);
    }

    #[test]
    fn failure_keeps_the_stale_result_for_retry() {
        let mut session = StudioSession::new();
        session.set_primary_image(portrait());
        session.begin_generation().unwrap();
        session.complete_generation(&generated()).unwrap();

        session.begin_generation().unwrap();
        session.fail_generation("the model declined");
        assert_eq!(session.status(), SessionStatus::Error);
        assert_eq!(session.last_error(), Some("the model declined"));
        assert!(session.result().is_some());
    }

    #[test]
    fn a_new_upload_discards_the_previous_result() {
        let mut session = StudioSession::new();
        session.set_primary_image(portrait());
        session.begin_generation().unwrap();
        session.complete_generation(&generated()).unwrap();

        session.set_primary_image(portrait());
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(session.result().is_none());
        assert!(session.last_error().is_none());
    }
}
