//! The agent cards of the three services.

use crate::builders::AgentCardBuilder;
use crate::types::AgentCard;

const CARD_VERSION: &str = "1.0";

/// Card for the front-facing router.
pub fn router_card(url: impl Into<String>) -> AgentCard {
    AgentCardBuilder::new(
        "RouterAgent",
        "Routes queries between the document Q&A and map agents",
        CARD_VERSION,
    )
    .with_url(url)
    .with_skill(
        "route_query",
        "Route Query",
        "Routes each query to the Q&A or Map agent",
        vec!["router".to_string()],
    )
    .build()
}

/// Card for the document question-answering backend.
pub fn answer_question_card(url: impl Into<String>) -> AgentCard {
    AgentCardBuilder::new(
        "AnswerQuestionAgent",
        "Answers questions about the project PDF",
        CARD_VERSION,
    )
    .with_url(url)
    .with_skill(
        "answer_question",
        "Answer Question",
        "Answers questions from the project PDF, falling back to general knowledge",
        vec!["qa".to_string()],
    )
    .build()
}

/// Card for the place-search backend.
pub fn map_card(url: impl Into<String>) -> AgentCard {
    AgentCardBuilder::new("MapAgent", "Map and place search", CARD_VERSION)
        .with_url(url)
        .with_skill(
            "find_place",
            "Find Place",
            "Finds places by description and address",
            vec!["map".to_string()],
        )
        .with_examples(vec!["best cafes near Satpaev University".to_string()])
        .build()
}
