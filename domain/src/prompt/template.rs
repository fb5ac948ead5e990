//! Fixed instruction texts used by the prompt builders

use crate::search::marker::{SEARCH_MARKER_CLOSE, SEARCH_MARKER_OPEN};

/// Templates for the fixed parts of each prompt
pub struct PromptTemplate;

impl PromptTemplate {
    /// Instruction for the participant who speaks first in the discussion
    pub fn opening_task() -> &'static str {
        r#"You are opening the discussion. Give your initial perspective on the topic.
Be clear about your reasoning so others can respond to it."#
    }

    /// Instruction for every later turn
    pub fn response_task(round: usize, total_rounds: usize) -> String {
        let closing = if round >= total_rounds {
            "\nThis is the final round: work toward a conclusion."
        } else {
            ""
        };
        format!(
            r#"It is round {round} of {total_rounds}. Respond to the discussion so far.
Refer to other participants by name when you agree or disagree, add new insight, and avoid repeating points already made.{closing}"#
        )
    }

    /// Explains the inline search marker a model may emit
    pub fn on_demand_search() -> String {
        format!(
            r#"If you need up-to-date facts from the web, write a search request on its own line in this exact form:
{open} your search query {close}
Requested searches run after your turn and their results are shared with everyone in later turns."#,
            open = SEARCH_MARKER_OPEN,
            close = SEARCH_MARKER_CLOSE,
        )
    }

    /// Instructions closing the summary prompt
    pub fn summary_task() -> &'static str {
        r#"Based on the discussion above, write the final answer for the user:

1. **Answer**: A clear, synthesized answer to the topic
2. **Key Points**: The most important insights that emerged
3. **Agreements and Disagreements**: Where participants converged and where they did not

Give extra weight to the points the user agreed with and address their objections where they disagreed.
Format your response with markdown headers."#
    }

    /// Instructions closing the follow-up prompt
    pub fn followup_task() -> &'static str {
        r#"Suggest exactly four follow-up questions the user might ask next, one per category.
Reply with exactly four lines in this format and nothing else:
CLARIFICATION: <question that clarifies a point of the answer>
EXPANSION: <question that goes deeper into one aspect>
EXAMPLE: <question asking for a concrete example>
ALTERNATIVE: <question exploring a different approach>"#
    }
}
