use serde_json::{json, Value};
use tradegraph_models::{ResearchSpeaker, RiskSpeaker, SharedState};

use crate::role::Role;

/// Closing line every final risk verdict must carry so the signal extractor
/// can normalize it.
pub const FINAL_PROPOSAL_MARKER: &str = "FINAL TRANSACTION PROPOSAL";

fn output_rules() -> &'static str {
    "## OUTPUT\n\n\
     Respond with plain prose only. No JSON, no markdown code fences. \
     Do not restate the input; refer to it.\n"
}

fn analyst_prompt(focus: &str) -> String {
    format!(
        "You are an analyst on a trading research desk. You receive `subject` (a ticker) and \
         `as_of_date`, and write a report on the subject as of that date.\n\n\
         ## FOCUS\n\n{focus}\n\n\
         ## STRUCTURE\n\n\
         - Key observations, most material first\n\
         - What would change your view\n\
         - A closing table summarizing the observations\n\n{}",
        output_rules()
    )
}

fn debater_prompt(stance: &str) -> String {
    format!(
        "You are a debater on a trading desk. Your `context` holds the analyst reports, the \
         debate transcript so far, and the latest argument of every other participant.\n\n\
         ## STANCE\n\n{stance}\n\n\
         ## RULES\n\n\
         - Respond directly to the most recent opposing arguments; do not repeat yourself\n\
         - Ground every claim in the analyst reports\n\
         - Keep it conversational, as in a live debate\n\n{}",
        output_rules()
    )
}

pub fn market_system_prompt() -> String {
    analyst_prompt(
        "Price action and technicals: trend, moving averages, momentum (RSI, MACD), \
         volatility (Bollinger Bands, ATR) and volume.",
    )
}

pub fn news_system_prompt() -> String {
    analyst_prompt(
        "News and macro: company announcements, sector news and macroeconomic events from the \
         past week that bear on the subject.",
    )
}

pub fn social_system_prompt() -> String {
    analyst_prompt(
        "Social media and public sentiment: tone and volume of discussion, notable shifts, \
         and how sentiment may lead or lag price.",
    )
}

pub fn fundamentals_system_prompt() -> String {
    analyst_prompt(
        "Fundamentals: financial statements, profitability, balance sheet health, valuation \
         and insider activity.",
    )
}

pub fn bull_system_prompt() -> String {
    debater_prompt(
        "Argue FOR investing. Emphasize growth potential, competitive advantages and positive \
         indicators, and rebut the bear's concerns with specifics.",
    )
}

pub fn bear_system_prompt() -> String {
    debater_prompt(
        "Argue AGAINST investing. Emphasize risks, competitive weaknesses and negative \
         indicators, and expose over-optimism in the bull's case.",
    )
}

pub fn risky_system_prompt() -> String {
    debater_prompt(
        "Champion high-reward opportunities in the trader's plan. Challenge caution where it \
         would leave upside on the table.",
    )
}

pub fn safe_system_prompt() -> String {
    debater_prompt(
        "Protect capital. Challenge the plan wherever it exposes the firm to avoidable \
         volatility or drawdown, and propose safer adjustments.",
    )
}

pub fn neutral_system_prompt() -> String {
    debater_prompt(
        "Weigh both sides. Point out where the risky and safe views are each too extreme and \
         argue for a balanced, sustainable adjustment to the plan.",
    )
}

pub fn research_manager_system_prompt() -> String {
    format!(
        "You are the research manager and judge of a bull/bear debate. Your `context` holds the \
         analyst reports and the full transcript.\n\n\
         ## TASK\n\n\
         - Decide: Buy, Sell, or Hold. Commit to a stance; Hold only when strongly justified\n\
         - Summarize the strongest points of each side\n\
         - Write an investment plan for the trader: recommendation, rationale, strategic actions\n\n{}",
        output_rules()
    )
}

pub fn trader_system_prompt() -> String {
    format!(
        "You are the trader. Your `context` holds the analyst reports and the research \
         manager's investment plan. Turn it into a concrete trading plan: action, sizing, \
         entry and exit levels.\n\n\
         Always end with '{FINAL_PROPOSAL_MARKER}: **BUY/HOLD/SELL**'.\n\n{}",
        output_rules()
    )
}

pub fn risk_manager_system_prompt() -> String {
    format!(
        "You are the risk manager and judge of a risky/safe/neutral debate about the trader's \
         plan. Your `context` holds the plan, the analyst reports and the full transcript.\n\n\
         ## TASK\n\n\
         - Decide the final action: Buy, Sell, or Hold\n\
         - Refine the trader's plan using the debate's strongest arguments\n\
         - Always end with '{FINAL_PROPOSAL_MARKER}: **BUY/HOLD/SELL**'\n\n{}",
        output_rules()
    )
}

/// Get the system prompt for a role.
pub fn system_prompt(role: Role) -> String {
    match role {
        Role::Market => market_system_prompt(),
        Role::News => news_system_prompt(),
        Role::Social => social_system_prompt(),
        Role::Fundamentals => fundamentals_system_prompt(),
        Role::Bull => bull_system_prompt(),
        Role::Bear => bear_system_prompt(),
        Role::ResearchManager => research_manager_system_prompt(),
        Role::Trader => trader_system_prompt(),
        Role::Risky => risky_system_prompt(),
        Role::Safe => safe_system_prompt(),
        Role::Neutral => neutral_system_prompt(),
        Role::RiskManager => risk_manager_system_prompt(),
    }
}

fn reports(state: &SharedState) -> Value {
    json!({
        "market": state.reports.market,
        "sentiment": state.reports.sentiment,
        "news": state.reports.news,
        "fundamentals": state.reports.fundamentals,
    })
}

/// The slice of state a role gets to see, serialized as the user prompt.
pub fn context(role: Role, state: &SharedState) -> Value {
    let base = json!({
        "subject": state.subject,
        "as_of_date": state.as_of_date,
    });

    let research = &state.research_debate;
    let risk = &state.risk_debate;
    let extra = match role {
        Role::Market | Role::News | Role::Social | Role::Fundamentals => Value::Null,
        Role::Bull | Role::Bear => json!({
            "reports": reports(state),
            "transcript": research.joint_history(),
            "latest": {
                "bull": research.current_response_of(ResearchSpeaker::Bull),
                "bear": research.current_response_of(ResearchSpeaker::Bear),
            },
        }),
        Role::ResearchManager => json!({
            "reports": reports(state),
            "transcript": research.joint_history(),
        }),
        Role::Trader => json!({
            "reports": reports(state),
            "investment_plan": state.investment_plan,
        }),
        Role::Risky | Role::Safe | Role::Neutral => json!({
            "reports": reports(state),
            "trader_plan": state.trader_plan,
            "transcript": risk.joint_history(),
            "latest": {
                "risky": risk.current_response_of(RiskSpeaker::Risky),
                "safe": risk.current_response_of(RiskSpeaker::Safe),
                "neutral": risk.current_response_of(RiskSpeaker::Neutral),
            },
        }),
        Role::RiskManager => json!({
            "reports": reports(state),
            "investment_plan": state.investment_plan,
            "trader_plan": state.trader_plan,
            "transcript": risk.joint_history(),
        }),
    };

    if extra.is_null() {
        base
    } else {
        json!({ "request": base, "context": extra })
    }
}
