use std::error::Error;
use std::path::PathBuf;

use anyhow::anyhow;
use dotenvy::dotenv;
use tracing::{debug, error, info};

mod catalog;
mod config;
mod llm;
mod prompt;
mod session;
mod utils;

use llm::gemini::{generate_styled_portrait, GenerationRequest};
use llm::media::PortraitImage;
use prompt::compile_instruction;
use session::StudioSession;
use utils::logging::init_logging;

type HandlerResult = Result<(), Box<dyn Error + Send + Sync>>;

// The original studio's download filename.
const DEFAULT_OUTPUT: &str = "studio-portrait.png";

fn usage() -> &'static str {
    "Usage: portrait_studio --input <photo> [--output <path>] \
[--hair <id>] [--fringe <id>] [--makeup <id>] [--clothing <id>] [--earrings <id>] \
[--gesture <id>] [--expression <id>] [--cap] [--smile-reference <photo>] \
[--print-prompt] [--list-styles]"
}

fn print_style_catalog() {
    println!("hair colors:");
    for color in catalog::HAIR_COLORS {
        println!(
            "  {:<14} {} / {} ({})",
            color.id, color.name, color.label, color.swatch
        );
    }
    let categories: &[(&str, &'static [catalog::StyleOption])] = &[
        ("fringe styles", catalog::FRINGE_STYLES),
        ("makeup styles", catalog::MAKEUP_STYLES),
        ("clothing styles", catalog::CLOTHING_STYLES),
        ("earring styles", catalog::EARRING_STYLES),
        ("gestures", catalog::GESTURE_STYLES),
        ("expressions", catalog::EXPRESSION_STYLES),
    ];
    for (name, options) in categories {
        println!("{name}:");
        for option in *options {
            println!("  {:<14} {}", option.id, option.label);
        }
    }
}

#[derive(Debug, Default)]
struct StudioArgs {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    hair: Option<String>,
    fringe: Option<String>,
    makeup: Option<String>,
    clothing: Option<String>,
    earrings: Option<String>,
    gesture: Option<String>,
    expression: Option<String>,
    cap: bool,
    smile_reference: Option<PathBuf>,
    print_prompt: bool,
    list_styles: bool,
}

fn flag_value<'a>(args: &'a [String], index: usize, flag: &str) -> anyhow::Result<&'a String> {
    args.get(index)
        .ok_or_else(|| anyhow!("Missing value for {flag}\n{}", usage()))
}

fn parse_studio_args(args: &[String]) -> anyhow::Result<StudioArgs> {
    let mut parsed = StudioArgs::default();

    let mut index = 1;
    while index < args.len() {
        match args[index].as_str() {
            "--input" => {
                index += 1;
                parsed.input = Some(PathBuf::from(flag_value(args, index, "--input")?));
            }
            "--output" => {
                index += 1;
                parsed.output = Some(PathBuf::from(flag_value(args, index, "--output")?));
            }
            "--hair" => {
                index += 1;
                parsed.hair = Some(flag_value(args, index, "--hair")?.clone());
            }
            "--fringe" => {
                index += 1;
                parsed.fringe = Some(flag_value(args, index, "--fringe")?.clone());
            }
            "--makeup" => {
                index += 1;
                parsed.makeup = Some(flag_value(args, index, "--makeup")?.clone());
            }
            "--clothing" => {
                index += 1;
                parsed.clothing = Some(flag_value(args, index, "--clothing")?.clone());
            }
            "--earrings" => {
                index += 1;
                parsed.earrings = Some(flag_value(args, index, "--earrings")?.clone());
            }
            "--gesture" => {
                index += 1;
                parsed.gesture = Some(flag_value(args, index, "--gesture")?.clone());
            }
            "--expression" => {
                index += 1;
                parsed.expression = Some(flag_value(args, index, "--expression")?.clone());
            }
            "--smile-reference" => {
                index += 1;
                parsed.smile_reference =
                    Some(PathBuf::from(flag_value(args, index, "--smile-reference")?));
            }
            "--cap" => {
                parsed.cap = true;
            }
            "--print-prompt" => {
                parsed.print_prompt = true;
            }
            "--list-styles" => {
                parsed.list_styles = true;
            }
            "--help" | "-h" => {
                return Err(anyhow!(usage()));
            }
            other => {
                return Err(anyhow!("Unknown argument: {other}\n{}", usage()));
            }
        }
        index += 1;
    }

    if parsed.input.is_none() && !parsed.print_prompt && !parsed.list_styles {
        return Err(anyhow!("--input is required\n{}", usage()));
    }

    Ok(parsed)
}

fn apply_selections(session: &mut StudioSession, args: &StudioArgs) -> anyhow::Result<()> {
    let selection = &mut session.selection;
    if let Some(id) = &args.hair {
        selection.select_hair_color(id)?;
    }
    if let Some(id) = &args.fringe {
        selection.select_fringe(id)?;
    }
    if let Some(id) = &args.makeup {
        selection.select_makeup(id)?;
    }
    if let Some(id) = &args.clothing {
        selection.select_clothing(id)?;
    }
    if let Some(id) = &args.earrings {
        selection.select_earrings(id)?;
    }
    if let Some(id) = &args.gesture {
        selection.select_gesture(id)?;
    }
    if let Some(id) = &args.expression {
        selection.select_expression(id)?;
    }
    selection.has_cap = args.cap;
    Ok(())
}

#[tokio::main]
async fn main() -> HandlerResult {
    dotenv().ok();
    let _guards = init_logging();

    let args: Vec<String> = std::env::args().collect();
    let args = parse_studio_args(&args)?;

    if args.list_styles {
        print_style_catalog();
        return Ok(());
    }

    let mut session = StudioSession::new();
    apply_selections(&mut session, &args)?;

    if let Some(path) = &args.smile_reference {
        session.set_smile_reference(PortraitImage::from_path(path).await?);
    }
    if let Some(path) = &args.input {
        session.set_primary_image(PortraitImage::from_path(path).await?);
    }

    if args.print_prompt {
        let instruction = compile_instruction(
            &session.selection,
            session.active_smile_reference().is_some(),
        );
        println!("{instruction}");
        return Ok(());
    }

    if session.selection.styling_mode().is_ancient() {
        info!("Ancient style mode active: hair, makeup, and accessories are delegated to the model");
    }

    session.begin_generation()?;
    info!(
        "Launching studio shoot (clothing={}, expression={})",
        session.selection.clothing.id, session.selection.expression.id
    );

    let outcome = {
        let Some(primary) = session.primary_image() else {
            return Err(anyhow!("--input is required\n{}", usage()).into());
        };
        let request = GenerationRequest {
            primary,
            smile_reference: session.active_smile_reference(),
            selection: &session.selection,
        };
        generate_styled_portrait(&request).await
    };

    match outcome {
        Ok(image) => {
            session.complete_generation(&image)?;
            let output = args
                .output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
            tokio::fs::write(&output, &image.bytes).await?;
            if let Some(result) = session.result() {
                info!(
                    "Styled portrait saved to {} ({}, generated at {})",
                    output.display(),
                    image.mime_type,
                    result.timestamp
                );
                debug!(
                    "Result data URIs ready for display: styled {} chars, original {} chars",
                    result.image_url.len(),
                    result.original_url.len()
                );
            }
            Ok(())
        }
        Err(err) => {
            session.fail_generation(err.to_string());
            let message = session.last_error().unwrap_or("Generation failed").to_string();
            error!("Generation failed: {message}");
            Err(message.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        std::iter::once("portrait_studio")
            .chain(values.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn input_is_required_unless_printing_the_prompt() {
        assert!(parse_studio_args(&args(&[])).is_err());
        assert!(parse_studio_args(&args(&["--print-prompt"])).is_ok());
        assert!(parse_studio_args(&args(&["--list-styles"])).is_ok());
        assert!(parse_studio_args(&args(&["--input", "me.jpg"])).is_ok());
    }

    #[test]
    fn style_flags_and_cap_are_collected() {
        let parsed = parse_studio_args(&args(&[
            "--input",
            "me.jpg",
            "--hair",
            "pink",
            "--clothing",
            "ancient",
            "--cap",
        ]))
        .unwrap();
        assert_eq!(parsed.hair.as_deref(), Some("pink"));
        assert_eq!(parsed.clothing.as_deref(), Some("ancient"));
        assert!(parsed.cap);
        assert!(parsed.output.is_none());
    }

    #[test]
    fn unknown_arguments_are_rejected_with_usage() {
        let err = parse_studio_args(&args(&["--input", "me.jpg", "--hat"])).unwrap_err();
        assert!(err.to_string().contains("Unknown argument: --hat"));
        assert!(err.to_string().contains("Usage:"));
    }

    #[test]
    fn selections_from_flags_reach_the_session() {
        let parsed = parse_studio_args(&args(&[
            "--print-prompt",
            "--expression",
            "smile",
            "--gesture",
            "v_sign",
        ]))
        .unwrap();
        let mut session = StudioSession::new();
        apply_selections(&mut session, &parsed).unwrap();
        assert_eq!(session.selection.expression.id, "smile");
        assert_eq!(session.selection.gesture.id, "v_sign");
        assert!(!session.selection.has_cap);
    }
}
