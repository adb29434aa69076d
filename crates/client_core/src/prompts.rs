//! Fixed prompt texts and the builders that assemble outbound prompts.

use serde_json::{json, Value};
use shared::domain::{ExplanationContext, Style};

/// Substring carried by every zero-text directive. Prompt assembly
/// guarantees it appears at least twice in a final image prompt.
pub const ZERO_TEXT_MARKER: &str = "ZERO text";

pub const SCENE_SYSTEM_INSTRUCTION: &str = r#"You are an expert in creating medical visual mnemonics for medical students. Your task is to transform a medical topic into a powerful learning tool.

For the given medical text, you must perform the following steps:
1.  Identify the absolute highest-yield concepts a student MUST know for their exams.
2.  Devise a creative, memorable, and cohesive theme for a single visual scene.
3.  Create a title for this scene.
4.  For each high-yield concept, invent a distinct, clever, and symbolic visual element (a character, object, or action) to represent it.
5.  Write a detailed prompt for an AI image generator. This prompt must describe the entire scene, integrating all symbolic elements into the cohesive theme. The scene must be minimalist, containing ONLY the necessary symbolic elements. It must be described in a way that is visually clear and easy to understand. **ULTRA-CRITICAL, NON-NEGOTIABLE RULE: The prompt must forcefully and repeatedly command the image generator to include ZERO text. Emphasize that any words, letters, labels, or numbers are strictly forbidden and will ruin the output.**
6.  Write a series of bullet points explaining the mnemonics. Each bullet point should clearly link a visual element to the specific high-yield fact it represents.

Your final output must be a single, minified JSON object with three keys: "title", "scene_prompt", and "explanation_points". "explanation_points" must be an array of strings.

Example:
Medical Text: "Listeria monocytogenes"
Your JSON output:
{
  "title": "The Listeria Ice Cream Factory",
  "scene_prompt": "A vibrant, cartoon-style scene inside a chilly, sparkling ice cream factory. In the center, a determined-looking action figure character named 'General Lister' is rocketing upwards... The entire scene is clean, clear, and focused only on these key elements, with no extra distractions. **ABSOLUTELY NO WORDS, TEXT, LETTERS, OR NUMBERS are allowed in the image. This is the most important rule. The image must be purely visual.** The style is sketchy and mnemonic.",
  "explanation_points": [
    "General Lister in the cold factory: Listeria is often transmitted through contaminated food products that are refrigerated, such as soft cheeses and milk, as it can grow in cold temperatures.",
    "Rocket-powered action figure: Represents Listeria's characteristic end-over-end 'tumbling motility' at room temperature.",
    "Thick purple coat: A mnemonic for being a Gram-positive bacterium.",
    "Glowing lightbulb power source: Represents that Listeria is catalase-positive."
  ]
}"#;

pub const INTEGRATION_SYSTEM_INSTRUCTION: &str = r#"You are an expert in evolving medical visual mnemonics. Your task is to seamlessly integrate a new medical concept into an existing mnemonic scene.

You will be given the title of the scene, the existing mnemonic explanations, and a user's request to add a new concept.

You must perform the following steps:
1.  Analyze the existing theme based on the title and explanation points.
2.  Invent a new, clever, and symbolic visual element to represent the user's requested concept. This new element MUST fit logically and stylistically within the established theme.
3.  Write a detailed prompt for an AI image editing model. This prompt should clearly describe how to add the new symbolic element to the scene without disrupting the existing elements. **ULTRA-CRITICAL, NON-NEGOTIABLE RULE: The prompt must command the image editor to include ZERO text. Emphasize that any words, letters, labels, or numbers are strictly forbidden.**
4.  Write a new bullet point for the mnemonic key. This bullet point must clearly explain the new visual element and the medical fact it represents.

Your final output must be a single, minified JSON object with two keys: "edit_prompt" (the prompt for the image editor) and "new_explanation_point" (the new bullet point for the key).

Example:
Scene Title: "The Staph Aureus Golden Pharaoh's Tomb"
Existing Explanations: ["Golden Sarcophagus: Represents S. aureus's golden color on agar.", "Catalase Cat Statue: A statue of a cat represents that it is catalase-positive."]
User Request: "Add something for nafcillin treatment."
Your JSON output:
{
  "edit_prompt": "In the hand of the golden pharaoh statue, add a realistic-looking pencil. The pencil should be made of solid gold to match the pharaoh. Do not add any text or words to the image.",
  "new_explanation_point": "Golden Pencil ('Pen'-cillin): The golden pencil held by the pharaoh is a mnemonic for penicillin-family antibiotics, like Nafcillin, which are used to treat S. aureus."
}"#;

pub const GENERATION_ZERO_TEXT_DIRECTIVE: &str = "ULTRA-CRITICAL RULE: The image must contain \
    ZERO text, ZERO letters, ZERO numbers. It must be a purely visual scene. Do NOT write on the \
    image. This is a strict, non-negotiable instruction.";

pub const EDIT_ZERO_TEXT_DIRECTIVE: &str = "CRITICAL, NON-NEGOTIABLE INSTRUCTION: The final edited \
    image must contain ZERO text: absolutely no words, letters, or numbers. This is the most \
    important rule. Ensure the image is purely visual.";

/// Prepended to a scene prompt that came back without its own zero-text
/// command.
const SCENE_PROMPT_GUARD: &str = "A purely visual scene that must contain ZERO text.";

pub fn style_suffix(style: Style) -> &'static str {
    match style {
        Style::Cartoon => "Style: vibrant cartoon, animated, playful, mnemonic, visual metaphor.",
        Style::Realistic => {
            "Style: photorealistic, detailed, realistic lighting, mnemonic, visual metaphor."
        }
        Style::Minimalist => {
            "Style: minimalist, clean lines, simple shapes, symbolic, mnemonic, visual metaphor."
        }
        Style::Sketchy => "Style: sketchy, hand-drawn, notepad sketch, mnemonic, visual metaphor.",
    }
}

/// Final Imagen prompt: scene prompt, style suffix, zero-text directive.
pub fn build_image_prompt(scene_prompt: &str, style: Style) -> String {
    let scene_prompt = scene_prompt.trim();
    let suffix = style_suffix(style);
    if scene_prompt.contains(ZERO_TEXT_MARKER) {
        format!("{scene_prompt} {suffix} {GENERATION_ZERO_TEXT_DIRECTIVE}")
    } else {
        format!("{SCENE_PROMPT_GUARD} {scene_prompt} {suffix} {GENERATION_ZERO_TEXT_DIRECTIVE}")
    }
}

/// User content for the context-aware integration call.
pub fn build_integration_prompt(context: &ExplanationContext, instruction: &str) -> String {
    let existing = Value::from(context.explanation_points.clone());
    format!(
        "Scene Title: \"{}\"\nExisting Explanations: {existing}\nUser Request: \"{}\"",
        context.title,
        instruction.trim()
    )
}

/// Text part sent with the image to the edit model.
pub fn build_edit_directive(directive: &str) -> String {
    let directive = directive.trim().trim_end_matches('.');
    format!("{directive}. {EDIT_ZERO_TEXT_DIRECTIVE}")
}

pub fn scene_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "scene_prompt": { "type": "STRING" },
            "explanation_points": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["title", "scene_prompt", "explanation_points"]
    })
}

pub fn integration_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "edit_prompt": { "type": "STRING" },
            "new_explanation_point": { "type": "STRING" }
        },
        "required": ["edit_prompt", "new_explanation_point"]
    })
}
