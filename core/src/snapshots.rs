//! Fixed report snapshots for the dashboard tabs.
//!
//! These are the hand-maintained reports the admin console shows when no
//! persisted snapshot exists. Each call builds a new snapshot stamped with
//! the current time.

use crate::report::Report;
use crate::reports::{ChatFlowEntry, EnhancementEntry, PhaseEntry, TabAuditEntry};
use crate::status::StatusCode::{self, Complete, Missing, Partial};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn chat_flow(
    tab: &str,
    context: StatusCode,
    flow: StatusCode,
    description: &str,
    triggers: &[&str],
    actions: &[&str],
    fallbacks: &[&str],
    suggestions: &[&str],
) -> ChatFlowEntry {
    ChatFlowEntry {
        tab_name: tab.to_string(),
        context_status: context,
        flow_status: flow,
        flow_description: description.to_string(),
        trigger_phrases: strings(triggers),
        available_actions: strings(actions),
        fallback_strategies: strings(fallbacks),
        suggestions: strings(suggestions),
    }
}

pub fn chat_flow_report() -> Report<ChatFlowEntry> {
    Report::new(vec![
        chat_flow(
            "Market Overview",
            Complete,
            Complete,
            "Price lookups, top movers and watchlist questions",
            &["price of", "top gainers", "market cap", "add to watchlist"],
            &["fetch_price", "list_movers", "update_watchlist"],
            &["Show cached prices when the market feed is down"],
            &[],
        ),
        chat_flow(
            "Twitter Sentiment",
            Complete,
            Partial,
            "Summarizes sentiment; cannot yet drill into single accounts",
            &["sentiment", "what is twitter saying", "bullish or bearish"],
            &["summarize_sentiment", "trending_tags"],
            &["Fall back to the last sentiment snapshot"],
            &["Add per-account drill down", "Explain sentiment score ranges"],
        ),
        chat_flow(
            "News Feed",
            Partial,
            Partial,
            "Headline summaries without source filtering",
            &["latest news", "headlines about"],
            &["summarize_headlines"],
            &[],
            &["Pass the selected news source into the chat context"],
        ),
        chat_flow(
            "AI Chat",
            Complete,
            Complete,
            "General assistant with model switching",
            &["ask", "explain", "compare"],
            &["answer", "switch_model", "clear_history"],
            &["Retry with the secondary model", "Return a canned help message"],
            &[],
        ),
        chat_flow(
            "Payments",
            Partial,
            Missing,
            "",
            &["pay with", "checkout"],
            &["open_checkout"],
            &[],
            &["Guide the user through card and crypto checkout in chat"],
        ),
        chat_flow(
            "Wallet Messaging",
            Missing,
            Missing,
            "",
            &[],
            &[],
            &[],
            &["Expose wallet inbox summaries to the chatbot"],
        ),
        chat_flow(
            "Avatar Studio",
            Missing,
            Partial,
            "Can start a render job but not report progress",
            &["make an avatar"],
            &["start_render"],
            &["Tell the user to check the studio tab"],
            &["Stream render progress into the chat"],
        ),
    ])
}

#[allow(clippy::too_many_arguments)]
fn tab_audit(
    tab: &str,
    route: &str,
    overall: StatusCode,
    api: StatusCode,
    ui: StatusCode,
    components: StatusCode,
    chatbot: StatusCode,
    suggestions: &[&str],
) -> TabAuditEntry {
    TabAuditEntry {
        tab_name: tab.to_string(),
        route: route.to_string(),
        overall_status: overall,
        api_connection_status: api,
        ui_responsive_status: ui,
        components_functional_status: components,
        chatbot_integration_status: chatbot,
        suggestions: strings(suggestions),
    }
}

pub fn tab_audit_report() -> Report<TabAuditEntry> {
    Report::new(vec![
        tab_audit("Market Overview", "/market", Complete, Complete, Complete, Complete, Complete, &[]),
        tab_audit(
            "Twitter Sentiment",
            "/sentiment",
            Partial,
            Complete,
            Complete,
            Partial,
            Complete,
            &["Chart legend overlaps on narrow screens"],
        ),
        tab_audit(
            "News Feed",
            "/news",
            Partial,
            Complete,
            Partial,
            Complete,
            Partial,
            &["Paginate the feed", "Cache headlines between reloads"],
        ),
        tab_audit("AI Chat", "/chat", Complete, Complete, Complete, Complete, Complete, &[]),
        tab_audit(
            "Payments",
            "/payments",
            Partial,
            Partial,
            Complete,
            Partial,
            Missing,
            &["Surface payment provider errors in the UI"],
        ),
        tab_audit(
            "Wallet Messaging",
            "/wallet",
            Missing,
            Missing,
            Partial,
            Missing,
            Missing,
            &["Connect the wallet messaging API", "Add empty-state copy"],
        ),
        tab_audit(
            "Avatar Studio",
            "/avatar",
            Partial,
            Complete,
            Partial,
            Partial,
            Missing,
            &["Show render queue position"],
        ),
    ])
}

fn enhancement(
    tab: &str,
    statuses: [StatusCode; 4],
    implemented: &[&str],
    suggestions: &[&str],
) -> EnhancementEntry {
    let [loading, data, responsive, chatbot] = statuses;
    EnhancementEntry {
        tab_name: tab.to_string(),
        loading_state_status: loading,
        data_integration_status: data,
        responsive_ui_status: responsive,
        chatbot_context_status: chatbot,
        implemented_enhancements: strings(implemented),
        suggestions: strings(suggestions),
    }
}

pub fn enhancement_report() -> Report<EnhancementEntry> {
    Report::new(vec![
        enhancement(
            "Market Overview",
            [Complete, Complete, Complete, Complete],
            &["Skeleton loaders", "Live price polling", "Mobile card layout", "Chat context sync"],
            &[],
        ),
        enhancement(
            "Twitter Sentiment",
            [Complete, Complete, Partial, Complete],
            &["Skeleton loaders", "Sentiment caching", "Chat context sync"],
            &["Collapse the tweet list on mobile"],
        ),
        enhancement(
            "News Feed",
            [Partial, Complete, Complete, Partial],
            &["Source aggregation", "Responsive grid"],
            &["Add a loading state for the summary panel"],
        ),
        enhancement(
            "AI Chat",
            [Complete, Complete, Complete, Complete],
            &["Typing indicator", "Model fallback", "Mobile composer", "Tab-aware prompts"],
            &[],
        ),
        enhancement(
            "Payments",
            [Partial, Partial, Complete, Missing],
            &["Responsive checkout"],
            &["Show a spinner while the payment intent is created"],
        ),
        enhancement(
            "Wallet Messaging",
            [Missing, Missing, Partial, Missing],
            &[],
            &["Start with the inbox data integration"],
        ),
        enhancement(
            "Avatar Studio",
            [Complete, Partial, Partial, Missing],
            &["Render progress bar"],
            &["Persist generated avatars", "Pass the selected avatar to chat"],
        ),
    ])
}

fn phase(id: &str, title: &str, items: &[(&str, StatusCode)], suggestions: &[&str]) -> PhaseEntry {
    PhaseEntry {
        phase_id: id.to_string(),
        title: title.to_string(),
        items: items.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        suggestions: strings(suggestions),
    }
}

pub fn diagnostic_report() -> Report<PhaseEntry> {
    Report::new(vec![
        phase(
            "phase-1",
            "Dashboard shell",
            &[
                ("tab_navigation", Complete),
                ("auth_flow", Complete),
                ("theme_support", Complete),
                ("error_boundaries", Complete),
            ],
            &[],
        ),
        phase(
            "phase-2",
            "Market data",
            &[
                ("price_feed", Complete),
                ("sentiment_feed", Complete),
                ("news_feed", Partial),
                ("rate_limit_handling", Partial),
            ],
            &["Back off on provider rate limits"],
        ),
        phase(
            "phase-3",
            "AI assistant",
            &[
                ("chat_endpoint", Complete),
                ("tab_context", Partial),
                ("smart_flows", Partial),
                ("conversation_history", Missing),
            ],
            &["Persist conversation history per user"],
        ),
        phase(
            "phase-4",
            "Payments and wallets",
            &[
                ("card_checkout", Partial),
                ("crypto_checkout", Partial),
                ("wallet_messaging", Missing),
                ("receipts", Missing),
            ],
            &["Finish webhook handling before enabling receipts"],
        ),
        phase(
            "phase-5",
            "Avatar and media",
            &[
                ("avatar_generation", Partial),
                ("voice_synthesis", Missing),
                ("video_export", Missing),
            ],
            &[],
        ),
    ])
}
