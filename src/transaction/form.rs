//! The form for adding a transaction, and validation of what was submitted.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    alert::ErrorAlert,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
    },
};

use super::core::{
    Amount, Category, MAX_AMOUNT, NewTransaction, TransactionName, TransactionType, format_date,
    parse_date,
};

/// The raw form data for a new transaction.
///
/// Missing fields are read as empty strings so that they are reported as
/// validation errors rather than rejected by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionForm {
    /// A short label for what the transaction was for.
    pub name: String,
    /// The amount as typed, e.g. "12.50".
    pub amount: String,
    /// Either "income" or "expense".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// The date as `YYYY-MM-DD`.
    pub date: String,
    /// The category as typed.
    pub category: String,
}

impl TransactionForm {
    /// Check every field and build the transaction to add.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, checking the name, amount, type, date and
    /// category in that order.
    pub fn validate(&self) -> Result<NewTransaction, Error> {
        Ok(NewTransaction {
            name: TransactionName::new(&self.name)?,
            amount: Amount::parse(&self.amount)?,
            transaction_type: self.transaction_type.parse()?,
            date: parse_date(&self.date)?,
            category: Category::new(&self.category)?,
        })
    }
}

/// The values to pre-fill the form with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFormDefaults {
    pub name: String,
    pub amount: String,
    pub transaction_type: TransactionType,
    pub date: String,
    pub category: String,
}

impl TransactionFormDefaults {
    /// An empty income transaction dated `today`.
    pub fn new(today: Date) -> Self {
        Self {
            name: String::new(),
            amount: String::new(),
            transaction_type: TransactionType::Income,
            date: format_date(today),
            category: String::new(),
        }
    }
}

impl From<TransactionForm> for TransactionFormDefaults {
    fn from(form: TransactionForm) -> Self {
        Self {
            name: form.name,
            amount: form.amount,
            transaction_type: form.transaction_type.parse().unwrap_or_default(),
            date: form.date,
            category: form.category,
        }
    }
}

/// The user facing message for a rejected form.
fn validation_message(error: &Error) -> String {
    match error {
        Error::EmptyTransactionName => "Enter a name for the transaction.".to_owned(),
        Error::EmptyCategory => "Enter a category for the transaction.".to_owned(),
        Error::InvalidAmount(amount) => format!("\"{amount}\" is not a number."),
        Error::NonPositiveAmount(_) => "The amount must be greater than zero.".to_owned(),
        Error::AmountTooLarge(_) => format!("The amount must be at most {MAX_AMOUNT}."),
        Error::AmountTooPrecise(_) => "Use at most two decimal places.".to_owned(),
        Error::InvalidTransactionType(_) => "Choose income or expense.".to_owned(),
        Error::InvalidDate(_) => "Pick a valid date.".to_owned(),
        error => error.to_string(),
    }
}

/// Render the form for adding a transaction that posts to `action`.
///
/// `categories` are offered as suggestions for the category field.
pub fn transaction_form(
    action: &str,
    defaults: &TransactionFormDefaults,
    categories: &[&str],
    error: Option<&Error>,
) -> Markup {
    let is_expense = matches!(defaults.transaction_type, TransactionType::Expense);
    let error_message = error.map(validation_message);

    html! {
        form
            id="create-transaction"
            method="post"
            action=(action)
            class="space-y-4"
        {
            @if let Some(message) = &error_message {
                (ErrorAlert {
                    message: "Could not add transaction.",
                    details: message,
                }.into_html())
            }

            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    name="name"
                    id="name"
                    type="text"
                    placeholder="e.g. Coffee"
                    value=(defaults.name)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0.01"
                    max=(MAX_AMOUNT.to_string())
                    placeholder="0.01"
                    value=(defaults.amount)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            fieldset class="space-y-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Type" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    div class="flex flex-1 items-center gap-3"
                    {
                        input
                            name="type"
                            id="transaction-type-income"
                            type="radio"
                            value="income"
                            checked[!is_expense]
                            required
                            class=(FORM_RADIO_INPUT_STYLE);

                        label for="transaction-type-income" class=(FORM_RADIO_LABEL_STYLE)
                        {
                            "Income"
                        }
                    }

                    div class="flex flex-1 items-center gap-3"
                    {
                        input
                            name="type"
                            id="transaction-type-expense"
                            type="radio"
                            value="expense"
                            checked[is_expense]
                            required
                            class=(FORM_RADIO_INPUT_STYLE);

                        label for="transaction-type-expense" class=(FORM_RADIO_LABEL_STYLE)
                        {
                            "Expense"
                        }
                    }
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    value=(defaults.date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                input
                    name="category"
                    id="category"
                    type="text"
                    list="category-suggestions"
                    placeholder="e.g. Food"
                    value=(defaults.category)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                datalist id="category-suggestions"
                {
                    @for category in categories {
                        option value=(category) {}
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Transaction" }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        Error,
        test_utils::{
            assert_form_action, assert_form_error_message, assert_form_input,
            assert_form_input_with_value, assert_form_submit_button_with_text, must_get_form,
        },
        transaction::{Amount, TransactionType},
    };

    use super::{TransactionForm, TransactionFormDefaults, transaction_form};

    fn valid_form() -> TransactionForm {
        TransactionForm {
            name: "  Coffee ".to_owned(),
            amount: "5".to_owned(),
            transaction_type: "expense".to_owned(),
            date: "2024-01-10".to_owned(),
            category: "Food".to_owned(),
        }
    }

    fn render(defaults: &TransactionFormDefaults, error: Option<&Error>) -> Html {
        let markup = transaction_form("/api/transactions", defaults, &["Food", "Work"], error);

        Html::parse_fragment(&markup.into_string())
    }

    #[test]
    fn valid_form_builds_transaction() {
        let transaction = valid_form().validate().unwrap();

        assert_eq!(transaction.name.as_ref(), "Coffee");
        assert_eq!(transaction.amount, Amount::new(dec!(5)).unwrap());
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.date, date!(2024 - 01 - 10));
        assert_eq!(transaction.category.as_ref(), "Food");
    }

    #[test]
    fn invalid_fields_are_rejected() {
        let cases = [
            (
                TransactionForm {
                    name: "   ".to_owned(),
                    ..valid_form()
                },
                Error::EmptyTransactionName,
            ),
            (
                TransactionForm {
                    amount: "abc".to_owned(),
                    ..valid_form()
                },
                Error::InvalidAmount("abc".to_owned()),
            ),
            (
                TransactionForm {
                    amount: "0".to_owned(),
                    ..valid_form()
                },
                Error::NonPositiveAmount(dec!(0)),
            ),
            (
                TransactionForm {
                    amount: "1000000000000".to_owned(),
                    ..valid_form()
                },
                Error::AmountTooLarge(dec!(1000000000000)),
            ),
            (
                TransactionForm {
                    amount: "1.005".to_owned(),
                    ..valid_form()
                },
                Error::AmountTooPrecise(dec!(1.005)),
            ),
            (
                TransactionForm {
                    transaction_type: "gift".to_owned(),
                    ..valid_form()
                },
                Error::InvalidTransactionType("gift".to_owned()),
            ),
            (
                TransactionForm {
                    date: "".to_owned(),
                    ..valid_form()
                },
                Error::InvalidDate("".to_owned()),
            ),
            (
                TransactionForm {
                    category: "".to_owned(),
                    ..valid_form()
                },
                Error::EmptyCategory,
            ),
        ];

        for (form, want) in cases {
            assert_eq!(form.validate(), Err(want), "form: {form:?}");
        }
    }

    #[test]
    fn missing_fields_deserialize_as_empty() {
        let form: TransactionForm = serde_urlencoded::from_str("name=Coffee").unwrap();

        assert_eq!(form.amount, "");
        assert_eq!(form.transaction_type, "");
        assert_eq!(form.validate(), Err(Error::InvalidAmount("".to_owned())));

        let form: TransactionForm =
            serde_urlencoded::from_str("name=Coffee&amount=5&date=2024-01-10").unwrap();
        assert_eq!(
            form.validate(),
            Err(Error::InvalidTransactionType("".to_owned()))
        );
    }

    #[test]
    fn unknown_type_is_shown_on_the_form() {
        let submitted = TransactionForm {
            transaction_type: "gift".to_owned(),
            ..valid_form()
        };

        let html = render(
            &submitted.clone().into(),
            Some(&submitted.validate().unwrap_err()),
        );
        let form = must_get_form(&html, "create-transaction");

        assert_form_error_message(&form, "Could not add transaction. Choose income or expense.");
        let checked = form
            .select(&Selector::parse("input[type=radio][name=type][checked]").unwrap())
            .count();
        assert_eq!(checked, 1, "want the form to fall back to a checked type");
    }

    #[test]
    fn renders_empty_form_with_defaults() {
        let html = render(&TransactionFormDefaults::new(date!(2024 - 03 - 05)), None);
        let form = must_get_form(&html, "create-transaction");

        assert_form_action(&form, "post", "/api/transactions");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_input_with_value(&form, "date", "date", "2024-03-05");
        assert_form_input(&form, "category", "text");
        assert_form_submit_button_with_text(&form, "Add Transaction");

        let checked = form
            .select(&Selector::parse("input[type=radio][name=type][checked]").unwrap())
            .map(|input| input.value().attr("value").unwrap_or_default())
            .collect::<Vec<_>>();
        assert_eq!(checked, vec!["income"]);

        let alerts = form.select(&Selector::parse("[role=alert]").unwrap()).count();
        assert_eq!(alerts, 0, "want no alert on a fresh form");
    }

    #[test]
    fn renders_submitted_values_and_error() {
        let submitted = TransactionForm {
            amount: "-3".to_owned(),
            ..valid_form()
        };

        let html = render(
            &submitted.clone().into(),
            Some(&submitted.validate().unwrap_err()),
        );
        let form = must_get_form(&html, "create-transaction");

        assert_form_input_with_value(&form, "name", "text", "  Coffee ");
        assert_form_input_with_value(&form, "amount", "number", "-3");
        assert_form_input_with_value(&form, "category", "text", "Food");
        assert_form_error_message(
            &form,
            "Could not add transaction. The amount must be greater than zero.",
        );

        let checked = form
            .select(&Selector::parse("input[type=radio][name=type][checked]").unwrap())
            .map(|input| input.value().attr("value").unwrap_or_default())
            .collect::<Vec<_>>();
        assert_eq!(checked, vec!["expense"]);
    }

    #[test]
    fn suggests_existing_categories() {
        let html = render(&TransactionFormDefaults::new(date!(2024 - 03 - 05)), None);

        let suggestions = html
            .select(&Selector::parse("datalist#category-suggestions option").unwrap())
            .map(|option| option.value().attr("value").unwrap_or_default())
            .collect::<Vec<_>>();

        assert_eq!(suggestions, vec!["Food", "Work"]);
    }
}
