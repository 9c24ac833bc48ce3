//! Reply composition.
//!
//! The model's generated text is the reply; recognized tool outcomes
//! append short bilingual confirmation suffixes on top of it. This is a
//! presentation convenience, not a substitute for the model's text: a
//! turn with no recognized successful tool leaves the text unmodified.

use crate::orchestrator::ExecutedToolCall;
use crate::tools::TaskTool;

const ADDED_SUFFIX: &str = "\n\n✅ Task added successfully! (Task add kar diya gaya!)";
const COMPLETED_SUFFIX: &str = "\n\n✅ Task completed! (Task complete ho gaya!)";
const DELETED_SUFFIX: &str = "\n\n🗑️ Task deleted! (Task delete kar diya gaya!)";

/// Appends confirmation suffixes for recognized tool outcomes.
#[must_use]
pub fn compose(text: &str, executed: &[ExecutedToolCall]) -> String {
    let mut reply = text.to_string();

    for call in executed {
        if !call.result.is_success() {
            continue;
        }
        match TaskTool::from_name(&call.name) {
            Some(TaskTool::AddTask) => reply.push_str(ADDED_SUFFIX),
            Some(TaskTool::CompleteTask) => reply.push_str(COMPLETED_SUFFIX),
            Some(TaskTool::DeleteTask) => reply.push_str(DELETED_SUFFIX),
            Some(TaskTool::GetUserProfile) => {
                let email = call
                    .result
                    .data
                    .as_ref()
                    .and_then(|data| data.get("email"))
                    .and_then(|email| email.as_str());
                if let Some(email) = email {
                    reply.push_str(&format!(
                        "\n\n📧 Your email is {email} (Aap ka email hai {email})"
                    ));
                }
            }
            _ => {}
        }
    }

    reply
}
