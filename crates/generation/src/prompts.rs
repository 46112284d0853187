//! Prompt construction: persona system prompts and the user prompt template.

use std::collections::BTreeMap;

use database::Persona;
use serde_json::Value;

/// Speed mode for a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    /// Short output, tight timeout, no retries, no sources section.
    Fast,
    /// Full-length output with citations and retries.
    Normal,
}

impl Speed {
    /// Parse a speed string. Anything other than "fast" is normal.
    pub fn parse(value: &str) -> Self {
        if value == "fast" {
            Speed::Fast
        } else {
            Speed::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Speed::Fast => "fast",
            Speed::Normal => "normal",
        }
    }

    pub fn is_fast(&self) -> bool {
        matches!(self, Speed::Fast)
    }
}

/// Known persona style categories. Unknown categories fall back to technical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Technical,
    Narrative,
    Analyst,
    Educator,
}

impl Category {
    fn parse(value: &str) -> Self {
        match value {
            "narrative" => Category::Narrative,
            "analyst" => Category::Analyst,
            "educator" => Category::Educator,
            _ => Category::Technical,
        }
    }

    fn system_prompt(&self) -> &'static str {
        match self {
            Category::Technical => TECHNICAL_SYSTEM,
            Category::Narrative => NARRATIVE_SYSTEM,
            Category::Analyst => ANALYST_SYSTEM,
            Category::Educator => EDUCATOR_SYSTEM,
        }
    }

    fn style_guidance(&self) -> &'static str {
        match self {
            Category::Technical => {
                "Use code blocks for technical examples. Define technical terms on first use."
            }
            Category::Narrative => {
                "Use storytelling elements. Include personal anecdotes or hypothetical scenarios."
            }
            Category::Analyst => {
                "Include data points. Reference industry reports. Provide numerical comparisons."
            }
            Category::Educator => {
                "Explain terms simply. Use 'imagine' scenarios. Include learning checks."
            }
        }
    }
}

const TECHNICAL_SYSTEM: &str = "\
You are an expert Technical Writer with deep expertise in technical communication.

Your writing should:
- Use precise, industry-standard terminology accurately
- Structure complex information with clear hierarchies (headings, subheadings, bullet points)
- Provide concrete examples and data to support claims
- Maintain a professional, objective tone throughout
- Include in-text citations for any factual claims using format: [Source Name](url)
- Balance depth with accessibility

Focus on accuracy and clarity over creativity.";

const NARRATIVE_SYSTEM: &str = "\
You are a master Storyteller who weaves facts into compelling narratives.

Your writing should:
- Begin with an engaging hook or anecdote that draws readers in
- Use vivid, sensory language and metaphor to make concepts memorable
- Build emotional connection while maintaining factual accuracy
- Use narrative arc: setup, conflict, resolution
- End with a memorable takeaway or reflection
- Include sources subtly, woven into the narrative

Focus on resonance and engagement.";

const ANALYST_SYSTEM: &str = "\
You are an Industry Analyst providing data-driven insights and strategic perspectives.

Your writing should:
- Lead with key trends, statistics, and market signals
- Use analytical frameworks (SWOT, Porter's Forces, etc.) where relevant
- Focus on business implications and practical takeaways
- Include forward-looking predictions with confidence levels
- Cite reputable research, reports, and expert opinions
- Use data visualizations in text form when helpful

Focus on actionable intelligence.";

const EDUCATOR_SYSTEM: &str = "\
You are an experienced Educator skilled at making complex topics accessible.

Your writing should:
- Start with clear learning objectives
- Explain concepts step-by-step, building understanding progressively
- Use analogies and real-world examples to anchor abstract ideas
- Check understanding with rhetorical questions
- Include summary takeaways and key points
- Cite beginner-friendly sources

Focus on clarity and learner success.";

const FAST_MIN_WORDS: u32 = 180;
const FAST_MAX_WORDS: u32 = 260;
const NORMAL_MIN_WORDS: u32 = 800;
const NORMAL_MAX_WORDS: u32 = 1200;

/// A rendered prompt pair ready for a provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPair {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Build the system and user prompts for a generation request.
///
/// The persona's category picks a base system prompt; its free-text
/// `system_prompt` field is appended as additional instructions. The user
/// prompt carries the topic, any additional context, the word-range
/// requirement for the speed mode, and a sources-section directive for
/// non-fast requests only.
pub fn build(
    topic: &str,
    persona: &Persona,
    additional_context: &Value,
    speed: Speed,
) -> PromptPair {
    let category = Category::parse(&persona.category);

    let mut system_prompt = category.system_prompt().to_string();
    if !persona.system_prompt.is_empty() {
        system_prompt.push_str("\n\nAdditional Instructions:\n");
        system_prompt.push_str(&persona.system_prompt);
    }

    let user_prompt = render_user_prompt(topic, category, additional_context, speed);

    PromptPair {
        system_prompt,
        user_prompt,
    }
}

fn render_user_prompt(
    topic: &str,
    category: Category,
    additional_context: &Value,
    speed: Speed,
) -> String {
    let (min_words, max_words) = if speed.is_fast() {
        (FAST_MIN_WORDS, FAST_MAX_WORDS)
    } else {
        (NORMAL_MIN_WORDS, NORMAL_MAX_WORDS)
    };

    let mut prompt = format!("Write a comprehensive blog post about: {topic}\n");

    let context = context_entries(additional_context);
    if !context.is_empty() {
        prompt.push_str("\nAdditional context to consider:\n");
        for (key, value) in context {
            prompt.push_str(&format!("- {key}: {value}\n"));
        }
    }

    prompt.push_str(&format!(
        "\nRequirements:\n\
         - Length: {min_words}-{max_words} words\n\
         - Include a compelling, descriptive headline\n\
         - Use markdown formatting (## for subheadings, ** for emphasis)\n\
         - End with a summary paragraph of key takeaways\n\
         - If specific sources are referenced, format as [Source Name](url)\n\
         - {}\n",
        category.style_guidance()
    ));

    if speed.is_fast() {
        prompt.push_str("- Optimize for speed: keep the response concise and focused.\n");
    } else {
        prompt.push_str(
            "\nAfter the main content, include a \"## Sources\" section listing all references.\n",
        );
    }

    prompt
}

/// Flatten a JSON context object into sorted key/value lines. Non-object
/// values and nulls are ignored.
fn context_entries(context: &Value) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();

    if let Some(object) = context.as_object() {
        for (key, value) in object {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Null => continue,
                other => other.to_string(),
            };
            entries.insert(key.clone(), rendered);
        }
    }

    entries
}
