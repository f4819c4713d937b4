//! Constants for well-known paths and content types.

/// The well-known path for the agent card (A2A v0.3+)
pub const AGENT_CARD_WELL_KNOWN_PATH: &str = "/.well-known/agent-card.json";

/// The previous well-known path for the agent card, still fetched by discovery tooling
pub const PREV_AGENT_CARD_WELL_KNOWN_PATH: &str = "/.well-known/agent.json";

/// The RPC path every service accepts `message/send` on
pub const DEFAULT_RPC_URL: &str = "/";

/// The only content type exchanged between the router and its backends
pub const TEXT_PLAIN: &str = "text/plain";
