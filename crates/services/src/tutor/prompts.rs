//! Prompt text for each tutor operation.

use std::fmt::Write as _;

use feynman_core::model::{Level, Persona};

use crate::questions::AdaptiveQuestionRequest;

const FEYNMAN_STEPS: &str = "The Feynman Technique has 4 steps:
1. Choose a concept to learn
2. Teach it to a child (simple explanation)
3. Identify gaps in your knowledge
4. Review and simplify";

/// A system/user prompt pair plus sampling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

fn with_persona(mut system: String, persona: Option<&Persona>, closing: &str) -> String {
    if let Some(persona) = persona {
        let _ = write!(
            system,
            "\n\nYou are embodying the personality of {}: {}\n\
             Your tone should be: {}\n\
             Your encouragement style: {}\n\
             Style guidelines: {}\n\
             {closing}",
            persona.name,
            persona.tagline,
            persona.tone,
            persona.encouragement_style,
            persona.style_guide.join(", "),
        );
    }
    system
}

#[must_use]
pub fn explanation(topic: &str, level: Level, persona: Option<&Persona>) -> ChatPrompt {
    let system = format!(
        "You are an expert educator using the Feynman Technique. Your goal is to explain \
         complex topics in the simplest possible way, as if teaching a child.\n\n\
         {FEYNMAN_STEPS}\n\n\
         For this request, focus on step 2: Create a simple, clear explanation that a {level} \
         learner can understand. Use analogies, simple language, and avoid jargon.\n\
         Be confident and decisive. Avoid hedging phrases like \"maybe,\" \"might,\" or \"could.\""
    );
    let closing = persona.map_or_else(String::new, |p| {
        format!(
            "Start your explanation with your intro message: \"{}\"",
            p.intro_message
        )
    });
    ChatPrompt {
        system: with_persona(system, persona, &closing),
        user: format!(
            "Explain \"{topic}\" using the Feynman Technique. Make it simple enough for a \
             {level} to understand. Use analogies and avoid technical jargon."
        ),
        max_tokens: 1000,
        temperature: 0.7,
    }
}

#[must_use]
pub fn guided_questions(topic: &str, level: Level, persona: Option<&Persona>) -> ChatPrompt {
    let system = format!(
        "You are an expert educator using the Feynman Technique. Create a series of guided \
         questions that help someone explain a topic step by step, as if teaching it to a child.\n\n\
         The questions should:\n\
         - Start with basic concepts and build up\n\
         - Help identify what the person knows and doesn't know\n\
         - Encourage simple, clear explanations\n\
         - Be appropriate for {level} level\n\
         - Guide the person to think through the topic systematically\n\n\
         Return questions as a JSON array of objects with \"question\", \"hint\", and \
         \"category\" fields. Categories can be: \"basic\", \"process\", \"example\", \
         \"analogy\", \"application\"."
    );
    ChatPrompt {
        system: with_persona(
            system,
            persona,
            "Frame your questions in your unique style and personality.",
        ),
        user: format!(
            "Create 5-7 guided questions for someone learning about \"{topic}\" at {level} \
             level. These questions should help them explain the topic step by step using the \
             Feynman Technique."
        ),
        max_tokens: 1200,
        temperature: 0.7,
    }
}

/// Standalone questions that check understanding; no persona styling.
#[must_use]
pub fn practice_questions(topic: &str, level: Level, count: u8) -> ChatPrompt {
    let system = format!(
        "You are an expert educator creating questions to test understanding using the \
         Feynman Technique.\n\n\
         Create questions that:\n\
         - Test deep understanding, not just memorization\n\
         - Help identify knowledge gaps\n\
         - Encourage explanation in simple terms\n\
         - Build from basic to more complex concepts\n\
         - Are appropriate for {level} level\n\n\
         Return questions as a JSON array of objects with \"question\" and \"type\" fields. \
         Types can be: \"conceptual\", \"application\", \"analogy\", \"explanation\"."
    );
    ChatPrompt {
        system,
        user: format!(
            "Generate {count} questions about \"{topic}\" for a {level} learner. Focus on \
             questions that test true understanding using the Feynman Technique principles."
        ),
        max_tokens: 1000,
        temperature: 0.7,
    }
}

#[must_use]
pub fn knowledge_gaps(topic: &str, explanation: &str, persona: Option<&Persona>) -> ChatPrompt {
    let system = "You are an expert educator using the Feynman Technique. Your job is to \
                  identify knowledge gaps in a user's explanation of a topic.\n\n\
                  Look for:\n\
                  - Missing key concepts\n\
                  - Incorrect information\n\
                  - Unclear explanations\n\
                  - Areas that need more detail\n\
                  - Confusing language or jargon\n\n\
                  Provide constructive feedback that helps the user improve their understanding.\n\
                  Be direct and confident. Avoid hedging and uncertainty in your assessments."
        .to_owned();
    ChatPrompt {
        system: with_persona(
            system,
            persona,
            "Provide feedback in your unique supportive style.",
        ),
        user: format!(
            "Topic: \"{topic}\"\nUser's explanation: \"{explanation}\"\n\n\
             Identify the knowledge gaps and areas for improvement in this explanation. \
             Be specific and constructive."
        ),
        max_tokens: 800,
        temperature: 0.5,
    }
}

#[must_use]
pub fn refinement(
    topic: &str,
    explanation: &str,
    audience: &str,
    persona: Option<&Persona>,
) -> ChatPrompt {
    let system = format!(
        "You are an expert educator using the Feynman Technique. Help refine a user's \
         explanation to make it clearer and more accessible.\n\n\
         Focus on:\n\
         - Simplifying complex language\n\
         - Adding helpful analogies\n\
         - Improving clarity and flow\n\
         - Making it appropriate for {audience}\n\
         - Maintaining accuracy while improving accessibility\n\n\
         Provide the refined explanation and explain what changes you made and why."
    );
    ChatPrompt {
        system: with_persona(
            system,
            persona,
            "Refine the explanation in your unique style and voice.",
        ),
        user: format!(
            "Topic: \"{topic}\"\nUser's explanation: \"{explanation}\"\n\
             Target audience: {audience}\n\n\
             Refine this explanation to make it clearer and more accessible. \
             Explain what changes you made and why."
        ),
        max_tokens: 1200,
        temperature: 0.6,
    }
}

#[must_use]
pub fn adaptive_question(request: &AdaptiveQuestionRequest) -> ChatPrompt {
    let system = "You are an expert educator using the Feynman Technique. Your role is to \
                  generate adaptive follow-up questions that create a personalized learning path.\n\n\
                  Based on the conversation history and the user's current answer, generate the \
                  next most appropriate question that will:\n\
                  - Build on what they've already shared\n\
                  - Address any knowledge gaps you've identified\n\
                  - Guide them deeper into understanding the topic\n\
                  - Adapt to their learning level and style\n\n\
                  The question should feel natural and conversational, like a real teacher would ask."
        .to_owned();

    let topic = &request.topic;
    let mut context = format!(
        "Topic: \"{topic}\" ({} level)\nCurrent question number: {}\n\nConversation History:\n",
        request.level, request.question_count
    );
    for (index, entry) in request.conversation_history.iter().enumerate() {
        let _ = write!(
            context,
            "{}. Q: {}\n   A: {}\n\n",
            index + 1,
            entry.question,
            entry.answer
        );
    }
    let _ = write!(context, "Current Answer: {}", request.current_answer);

    ChatPrompt {
        system: with_persona(
            system,
            request.character_context.as_ref(),
            "Frame your question in your unique style and personality.",
        ),
        user: format!(
            "{context}\n\n\
             Generate the next question that will help the user understand \"{topic}\" better. \
             Consider:\n\
             - What they've already explained well\n\
             - What gaps or unclear areas you've noticed\n\
             - How to build on their current understanding\n\
             - What would be most helpful to explore next\n\n\
             Return a JSON object with:\n\
             - question: The next question to ask\n\
             - hint: A helpful hint or clarification\n\
             - category: One of: basic, process, example, analogy, application, follow-up, clarification\n\
             - reasoning: Brief explanation of why this question is important\n\n\
             If the user seems to have a good understanding and you've covered the main concepts, \
             you can return null for the question to indicate the session should end."
        ),
        max_tokens: 1000,
        temperature: 0.7,
    }
}
