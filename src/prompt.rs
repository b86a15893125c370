//! Prompt compiler: maps the current selections to the single instruction
//! string sent to the image model. Pure and deterministic; the dispatcher
//! calls it once per submit.

use crate::session::{SelectionState, StylingMode};

const CAP_WORN: &str = "She is wearing a stylish, modern baseball cap that complements her look. Her long hair flows gracefully from underneath the cap.";
const CAP_NONE: &str = "She is not wearing any headwear or caps.";

/// Emitted instead of the individual fragments when ancient mode is active:
/// hair, makeup, and accessories are delegated to the model.
const ANCIENT_CREATIVE_LICENSE: &str = "AI CREATIVE CONTROL: Since this is a specialized ANCIENT STYLE (古装) theme, you have absolute creative freedom to design the hair color (keep it elegant and fitting), an elaborate traditional hairstyle, delicate ancient-style makeup, and exquisite jewelry/accessories to perfectly match the costume. Create a stunning, cinematic, high-end cohesive look where all elements work together for a modern \"ancient drama\" aesthetic.";

const SMILE_REFERENCE_CLAUSE: &str = "Refer to the second provided image for the specific character of her smile and facial expression.";

const FRAMING_OPENING: &str = "A professional high-end studio photography close-up portrait of a youthful girl.";

const FRAMING_CLOSING: &str = "SETTING: A high-end photography studio with professional softbox lighting and a clean, neutral, seamless backdrop.\n\
AESTHETIC: A \"youthful portrait\" (青春写真) with a soft, clean, and elegant feel.\n\n\
CRITICAL IDENTITY PRESERVATION:\n\
1. The facial features, bone structure, and eyes must remain 100% IDENTICAL to the person in the provided reference image (Image 1).\n\
2. Maintain the exact proportions of the nose, mouth, eyes, and chin from the reference. This is a transformation of the *same* person, not a new person.\n\
3. The output must be a single high-quality image part.\n\
4. 8k resolution, editorial quality, realistic skin texture, realistic hair rendering.";

/// Compiles the full instruction for one generation.
///
/// `has_smile_reference` tells the compiler whether a second image will be
/// attached to the request; the refer-to-second-image clause is only emitted
/// when that image is present, the smile expression is selected, and ancient
/// mode is inactive.
pub fn compile_instruction(selection: &SelectionState, has_smile_reference: bool) -> String {
    let mode = selection.styling_mode();

    let styling = match mode {
        StylingMode::AncientTheme => format!(
            "CLOTHING & THEME: {}.\n{}",
            selection.clothing.prompt, ANCIENT_CREATIVE_LICENSE
        ),
        StylingMode::Individual => {
            let cap_clause = if selection.has_cap { CAP_WORN } else { CAP_NONE };
            format!(
                "HAIR: Stunningly long, voluminous, flowing {} hair with {}.\n{}\nMAKEUP: {}.\nCLOTHING: {}.\nACCESSORIES: {}",
                selection.hair_color.prompt,
                selection.fringe.prompt,
                cap_clause,
                selection.makeup.prompt,
                selection.clothing.prompt,
                selection.earrings.prompt,
            )
        }
    };

    let gesture_clause = format!("POSE & GESTURE: {}", selection.gesture.prompt);

    let smile_reference_applies =
        has_smile_reference && selection.expression.id == "smile" && !mode.is_ancient();
    let expression_clause = if smile_reference_applies {
        format!(
            "EXPRESSION: {}. {}",
            selection.expression.prompt, SMILE_REFERENCE_CLAUSE
        )
    } else {
        format!("EXPRESSION: {}.", selection.expression.prompt)
    };

    format!("{FRAMING_OPENING}\n{styling}\n{gesture_clause}\n{expression_clause}\n\n{FRAMING_CLOSING}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SelectionState;

    fn selection() -> SelectionState {
        SelectionState::default()
    }

    #[test]
    fn compilation_is_deterministic() {
        let mut state = selection();
        state.select_clothing("hoodie").unwrap();
        state.select_expression("smile").unwrap();
        assert_eq!(
            compile_instruction(&state, true),
            compile_instruction(&state, true)
        );
    }

    #[test]
    fn individual_mode_emits_every_fragment_in_order() {
        let mut state = selection();
        state.select_hair_color("silver").unwrap();
        state.select_fringe("auto").unwrap();
        state.select_makeup("none").unwrap();
        state.select_clothing("tshirt").unwrap();
        state.select_earrings("none").unwrap();
        state.select_gesture("none").unwrap();
        state.select_expression("auto").unwrap();
        state.has_cap = false;

        let instruction = compile_instruction(&state, false);
        assert!(instruction.contains("silvery-white"));
        assert!(instruction.contains("not wearing any headwear"));
        assert!(instruction.contains("no makeup, completely natural skin texture"));
        assert!(instruction.contains("oversized white t-shirt"));
        assert!(instruction.contains("not wearing any earrings"));
        assert!(!instruction.contains(SMILE_REFERENCE_CLAUSE));

        let hair = instruction.find("HAIR:").unwrap();
        let makeup = instruction.find("MAKEUP:").unwrap();
        let clothing = instruction.find("CLOTHING:").unwrap();
        let accessories = instruction.find("ACCESSORIES:").unwrap();
        assert!(hair < makeup && makeup < clothing && clothing < accessories);
    }

    #[test]
    fn cap_flag_switches_the_cap_clause() {
        let mut state = selection();
        state.has_cap = true;
        let instruction = compile_instruction(&state, false);
        assert!(instruction.contains("baseball cap"));
        assert!(!instruction.contains(CAP_NONE));
    }

    #[test]
    fn ancient_mode_suppresses_the_individual_fragments() {
        let mut state = selection();
        state.select_hair_color("pink").unwrap();
        state.select_makeup("fox").unwrap();
        state.select_earrings("drop").unwrap();
        state.select_clothing("ancient").unwrap();
        state.has_cap = true;

        let instruction = compile_instruction(&state, false);
        assert!(instruction.contains("Hanfu"));
        assert!(instruction.contains("AI CREATIVE CONTROL"));
        assert!(!instruction.contains(state.hair_color.prompt));
        assert!(!instruction.contains(state.makeup.prompt));
        assert!(!instruction.contains(state.earrings.prompt));
        assert!(!instruction.contains(state.fringe.prompt));
        assert!(!instruction.contains("baseball cap"));
        assert!(!instruction.contains(CAP_NONE));
    }

    #[test]
    fn ancient_mode_still_emits_gesture_and_expression() {
        let mut state = selection();
        state.select_clothing("ancient").unwrap();
        let instruction = compile_instruction(&state, false);
        assert!(instruction.contains("POSE & GESTURE:"));
        assert!(instruction.contains("EXPRESSION:"));
    }

    #[test]
    fn smile_reference_clause_requires_all_three_conditions() {
        let mut state = selection();
        state.select_expression("smile").unwrap();
        assert!(compile_instruction(&state, true).contains(SMILE_REFERENCE_CLAUSE));

        // No secondary image supplied.
        assert!(!compile_instruction(&state, false).contains(SMILE_REFERENCE_CLAUSE));

        // Smile expression not selected.
        let mut no_smile = selection();
        no_smile.select_expression("slight_smile").unwrap();
        assert!(!compile_instruction(&no_smile, true).contains(SMILE_REFERENCE_CLAUSE));

        // Ancient mode supersedes the individual-selection pipeline.
        state.select_clothing("ancient").unwrap();
        assert!(!compile_instruction(&state, true).contains(SMILE_REFERENCE_CLAUSE));
    }

    #[test]
    fn framing_text_wraps_every_compilation() {
        let instruction = compile_instruction(&selection(), false);
        assert!(instruction.starts_with(FRAMING_OPENING));
        assert!(instruction.contains("CRITICAL IDENTITY PRESERVATION"));
        assert!(instruction.contains("8k resolution"));
    }
}
