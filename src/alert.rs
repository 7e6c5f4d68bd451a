//! Inline alert for telling the user why their input was rejected.

use maud::{Markup, html};

const ERROR_ALERT_STYLE: &str = "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
    dark:bg-gray-800 dark:text-red-400 border border-red-300 dark:border-red-800";

/// An error message with an optional hint on how to fix it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorAlert<'a> {
    pub message: &'a str,
    pub details: &'a str,
}

impl ErrorAlert<'_> {
    pub fn into_html(self) -> Markup {
        html! {
            div class=(ERROR_ALERT_STYLE) role="alert"
            {
                span class="font-medium" { (self.message) }

                @if !self.details.is_empty() {
                    " " (self.details)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::ErrorAlert;

    #[test]
    fn renders_message_and_details() {
        let markup = ErrorAlert {
            message: "Could not add transaction.",
            details: "Amount must be greater than zero.",
        }
        .into_html();

        let html = Html::parse_fragment(&markup.into_string());
        let alert = html
            .select(&Selector::parse("[role=alert]").unwrap())
            .next()
            .expect("No alert found");
        let text = alert.text().collect::<String>();

        assert_eq!(
            text,
            "Could not add transaction. Amount must be greater than zero."
        );
    }
}
