use insight_core::{EventCard, MarketSnapshot, NewsItem};

/// Bumped whenever prompt wording changes; recorded in every artifact's
/// provenance so outputs can be traced to the template that produced them.
pub const TEMPLATE_VERSION: &str = "v1";

pub const SYSTEM_PROMPT: &str = "You are a market analyst producing structured JSON. \
Respond with a single JSON object and nothing else. Do not include markdown fences, \
commentary, or trailing text.";

/// Prompt asking the backend for one event card covering a category cluster
pub fn event_card_prompt(category: &str, items: &[NewsItem]) -> String {
    let mut prompt = String::with_capacity(1024);
    prompt.push_str(&format!(
        "Synthesize the following {} news items into one event card.\n\nItems:\n",
        category
    ));

    for item in items {
        prompt.push_str(&format!(
            "- [{} | credibility {}] {}",
            item.source, item.credibility, item.title
        ));
        if !item.excerpt.is_empty() {
            prompt.push_str(&format!(" :: {}", item.excerpt));
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "\nReturn a JSON object with exactly these fields:\n\
         {\n\
         \"title\": string,\n\
         \"summary\": string (2-3 sentences),\n\
         \"impact\": \"low\" | \"medium\" | \"high\",\n\
         \"affected_assets\": [string],\n\
         \"confidence\": integer 0-100,\n\
         \"rationale\": string\n\
         }",
    );
    prompt
}

/// Prompt asking the backend for a full market insight
pub fn insight_prompt(snapshot: &MarketSnapshot, events: &[EventCard]) -> String {
    let mut prompt = String::with_capacity(2048);
    prompt.push_str("Produce a structured market insight from the data below.\n\nMarket summary:\n");
    prompt.push_str(&format!(
        "- equity trend: {}\n- volatility: {:?}\n- dollar: {:?}\n- risk appetite: {:?}\n- yields: {:?}\n",
        snapshot.summary.equity_trend.to_label(),
        snapshot.summary.volatility_level,
        snapshot.summary.dollar_strength,
        snapshot.summary.risk_appetite,
        snapshot.summary.yield_environment,
    ));

    prompt.push_str("\nQuotes:\n");
    let mut symbols: Vec<&String> = snapshot.quotes.keys().collect();
    symbols.sort();
    for symbol in symbols {
        if let Some(quote) = snapshot.quotes.get(symbol) {
            let trend = quote
                .indicators
                .as_ref()
                .map(|i| i.trend.to_label())
                .unwrap_or("Unknown");
            prompt.push_str(&format!(
                "- {} ({}): {:.2} ({:+.2}%), trend {}\n",
                quote.symbol, quote.name, quote.price, quote.change_percent, trend
            ));
        }
    }

    if events.is_empty() {
        prompt.push_str("\nRecent events: none.\n");
    } else {
        prompt.push_str("\nRecent events:\n");
        for event in events {
            prompt.push_str(&format!(
                "- [{} | {:?}] {}: {}\n",
                event.category.as_str(),
                event.impact,
                event.title,
                event.summary
            ));
        }
    }

    prompt.push_str(
        "\nReturn a JSON object with exactly these fields:\n\
         {\n\
         \"theses\": [string] (2-4 entries),\n\
         \"evidence\": [{\"claim\": string, \"source\": string}],\n\
         \"counter_arguments\": [string],\n\
         \"scenarios\": {\"base\": string, \"bull\": string, \"bear\": string},\n\
         \"confidence\": integer 0-100,\n\
         \"risk_level\": \"low\" | \"moderate\" | \"elevated\" | \"high\",\n\
         \"horizon\": string,\n\
         \"asset_implications\": [{\"asset_class\": string, \"direction\": \"bearish\" | \"neutral\" | \"bullish\", \"note\": string}]\n\
         }",
    );
    prompt
}
