use maud::{Markup, html};

use crate::{
    Error, endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, CATEGORY_BADGE_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
};

use super::{
    core::{TransactionType, format_date},
    filter::TransactionFilter,
    form::{TransactionFormDefaults, transaction_form},
    summary::Summary,
    transactions_page::{CategoryOption, LedgerViewModel, TransactionTableRow},
};

fn amount_class(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "text-green-700 dark:text-green-300",
        TransactionType::Expense => "text-red-700 dark:text-red-300",
    }
}

pub(crate) fn transactions_view(
    view_model: &LedgerViewModel,
    form_defaults: &TransactionFormDefaults,
    form_error: Option<&Error>,
    currency_symbol: &str,
) -> Markup {
    let categories = view_model
        .categories
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>();

    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-6"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::EXPORT_TRANSACTIONS) id="export-link" class=(LINK_STYLE)
                    {
                        "Export CSV"
                    }
                }

                section class=(CARD_STYLE)
                {
                    h2 class="text-sm font-medium text-gray-500 dark:text-gray-400" { "Balance" }

                    p id="balance" class="text-3xl font-bold"
                    {
                        (format_currency(view_model.summary.balance, currency_symbol))
                    }
                }

                div class="grid gap-6 lg:grid-cols-3"
                {
                    section class={ (CARD_STYLE) " lg:col-span-2" }
                    {
                        (filter_form(&view_model.filter, &view_model.category_options))

                        (transaction_table(&view_model.rows, currency_symbol))
                    }

                    div class="space-y-6"
                    {
                        section class=(CARD_STYLE)
                        {
                            h2 class="text-lg font-semibold" { "Add Transaction" }

                            (transaction_form(
                                &view_model.create_url,
                                form_defaults,
                                &categories,
                                form_error,
                            ))
                        }

                        section class=(CARD_STYLE)
                        {
                            h2 class="text-lg font-semibold" { "Monthly Summary" }

                            (monthly_summary(&view_model.summary, currency_symbol))
                        }
                    }
                }
            }
        }
    };

    base("Transactions", &content)
}

fn filter_form(filter: &TransactionFilter, category_options: &[CategoryOption]) -> Markup {
    let start = filter.start.map(format_date);
    let end = filter.end.map(format_date);

    html! {
        form
            id="filter"
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="grid gap-4 sm:grid-cols-4 items-end"
        {
            div
            {
                label for="start" class=(FORM_LABEL_STYLE) { "From" }

                input
                    name="start"
                    id="start"
                    type="date"
                    value=[start]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end" class=(FORM_LABEL_STYLE) { "To" }

                input
                    name="end"
                    id="end"
                    type="date"
                    value=[end]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category-filter" class=(FORM_LABEL_STYLE) { "Category" }

                select name="category" id="category-filter" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for category_option in category_options {
                        option
                            value=(category_option.value)
                            selected[category_option.selected]
                        {
                            (category_option.label)
                        }
                    }
                }
            }

            div class="flex gap-4 items-center"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }

                a href=(endpoints::TRANSACTIONS_VIEW) id="clear-filter" class=(LINK_STYLE)
                {
                    "Clear"
                }
            }
        }
    }
}

fn transaction_table(rows: &[TransactionTableRow], currency_symbol: &str) -> Markup {
    html! {
        div class="overflow-x-auto"
        {
            table class="w-full my-2 text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody id="transaction-list"
                {
                    @for row in rows {
                        (transaction_row_view(row, currency_symbol))
                    }

                    @if rows.is_empty() {
                        tr
                        {
                            td
                                colspan="5"
                                data-empty-state="true"
                                class="px-6 py-4 text-center"
                            {
                                "No transactions found."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transaction_row_view(row: &TransactionTableRow, currency_symbol: &str) -> Markup {
    let amount = match row.transaction_type {
        TransactionType::Income => row.amount,
        TransactionType::Expense => -row.amount,
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(row.id)
        {
            td class={ (TABLE_CELL_STYLE) " name" } title=[row.full_name.as_deref()] { (row.name) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (row.category) }
            }
            td class=(TABLE_CELL_STYLE) { time datetime=(row.date) { (row.date) } }
            td class={ "px-6 py-4 text-right amount " (amount_class(row.transaction_type)) }
            {
                (format_currency(amount, currency_symbol))
            }
            td class=(TABLE_CELL_STYLE)
            {
                form method="post" action=(row.delete_url)
                {
                    button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                }
            }
        }
    }
}

fn monthly_summary(summary: &Summary, currency_symbol: &str) -> Markup {
    html! {
        ul id="monthly-summary" class="space-y-1 text-sm"
        {
            @for totals in &summary.months {
                li
                {
                    (totals.month) ": Income "
                    (format_currency(totals.income, currency_symbol))
                    " | Expense "
                    (format_currency(totals.expense, currency_symbol))
                }
            }

            @if summary.months.is_empty() {
                li class="text-gray-500 dark:text-gray-400" { "No transactions for selected range." }
            }
        }
    }
}
