//! The sample catalog a session starts from

use chrono::{DateTime, Utc};

use crate::changelog::TrackedField;
use crate::models::{Category, ChangelogEntry, Dataset, GlossaryMetric, SqlPattern};

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}

fn sql(id: &str, label: &str, query: &str) -> SqlPattern {
    SqlPattern {
        id: id.to_string(),
        label: label.to_string(),
        query: query.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    name: &str,
    description: &str,
    category: Category,
    dataset: Dataset,
    synonyms: &[&str],
    sql_patterns: Vec<SqlPattern>,
    sample_question: &str,
    related: &[&str],
) -> GlossaryMetric {
    GlossaryMetric {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category,
        dataset,
        synonyms: strings(synonyms),
        sql_patterns,
        sample_question: sample_question.to_string(),
        related_metric_ids: strings(related),
        changelog: Vec::new(),
    }
}

/// Twelve common business metrics with SQL patterns and lineage
pub fn sample_metrics() -> Vec<GlossaryMetric> {
    let mut invoice = sample(
        "1",
        "Invoice",
        "A bill or financial record for services provided during a patient visit",
        Category::Financial,
        Dataset::Finance,
        &["Bill", "Statement", "Charge"],
        vec![
            sql("s1", "Total Invoices", "SELECT COUNT(*) FROM invoices WHERE status = 'active'"),
            sql("s2", "Unpaid Invoices", "SELECT * FROM invoices WHERE paid = false"),
        ],
        "Show me all unpaid invoices",
        &["3", "12"],
    );
    invoice.changelog.push(ChangelogEntry {
        id: "c1".to_string(),
        timestamp: at("2025-12-15T10:30:00Z"),
        field: TrackedField::Description.as_str().to_string(),
        old_value: "A financial record".to_string(),
        new_value: "A bill or financial record for services provided during a patient visit"
            .to_string(),
        user: "Admin".to_string(),
    });

    let mut revenue = sample(
        "3",
        "Revenue",
        "Total money collected or billed for medical services",
        Category::Financial,
        Dataset::Finance,
        &["Income", "Earnings", "Sales"],
        vec![
            sql("s4", "Total Revenue", "SELECT SUM(revenue) FROM transactions"),
            sql(
                "s5",
                "Revenue by Region",
                "SELECT region, SUM(revenue) FROM transactions GROUP BY region",
            ),
        ],
        "What's our total revenue?",
        &["1", "2", "12", "11"],
    );
    revenue.changelog.push(ChangelogEntry {
        id: "c2".to_string(),
        timestamp: at("2026-01-10T14:00:00Z"),
        field: TrackedField::Synonyms.as_str().to_string(),
        old_value: "Income, Earnings".to_string(),
        new_value: "Income, Earnings, Sales".to_string(),
        user: "Admin".to_string(),
    });

    vec![
        invoice,
        sample(
            "2",
            "GMV",
            "Gross Merchandise Value - total value of merchandise sold",
            Category::Financial,
            Dataset::Sales,
            &["gross sales", "gross revenue"],
            vec![sql("s3", "Monthly GMV", "SELECT SUM(amount) FROM orders GROUP BY month")],
            "What is the GMV for last month?",
            &["3", "4"],
        ),
        revenue,
        sample(
            "4",
            "AOV",
            "Average Order Value - mean value per order",
            Category::Financial,
            Dataset::Sales,
            &["average basket", "avg order"],
            vec![sql("s6", "AOV Calculation", "SELECT AVG(order_total) FROM orders")],
            "Show AOV trend by month",
            &["2", "3"],
        ),
        sample(
            "5",
            "CAC",
            "Customer Acquisition Cost - total cost to acquire a new customer",
            Category::Marketing,
            Dataset::Marketing,
            &["acquisition cost", "cost per customer"],
            vec![sql(
                "s7",
                "CAC by Channel",
                "SELECT channel, SUM(spend)/COUNT(new_customers) FROM marketing GROUP BY channel",
            )],
            "What is our CAC by channel?",
            &["6", "8"],
        ),
        sample(
            "6",
            "LTV",
            "Lifetime Value - predicted net profit from entire customer relationship",
            Category::Customer,
            Dataset::Customer,
            &["CLV", "customer lifetime value", "lifetime revenue"],
            vec![sql("s8", "Average LTV", "SELECT AVG(lifetime_value) FROM customers")],
            "What is the average customer LTV?",
            &["5", "7", "3"],
        ),
        sample(
            "7",
            "Churn Rate",
            "Percentage of customers who stop using the service in a given period",
            Category::Customer,
            Dataset::Customer,
            &["attrition rate", "customer loss rate"],
            vec![sql(
                "s9",
                "Monthly Churn",
                "SELECT month, churned/total AS churn_rate FROM customer_stats",
            )],
            "What is our monthly churn rate?",
            &["6", "10"],
        ),
        sample(
            "8",
            "Conversion Rate",
            "Percentage of visitors who complete a desired action",
            Category::Marketing,
            Dataset::Marketing,
            &["CVR", "conversion percentage"],
            vec![sql("s10", "Overall CVR", "SELECT conversions/visits AS cvr FROM funnel_data")],
            "What is our conversion rate this quarter?",
            &["5", "9"],
        ),
        sample(
            "9",
            "DAU",
            "Daily Active Users - unique users engaging with the product daily",
            Category::Product,
            Dataset::Product,
            &["daily users", "active users"],
            vec![sql(
                "s11",
                "DAU Trend",
                "SELECT date, COUNT(DISTINCT user_id) FROM events GROUP BY date",
            )],
            "Show DAU for the past 30 days",
            &["8", "11"],
        ),
        sample(
            "10",
            "NPS",
            "Net Promoter Score - measures customer loyalty and satisfaction",
            Category::Customer,
            Dataset::Customer,
            &["promoter score", "satisfaction score"],
            vec![sql(
                "s12",
                "Current NPS",
                "SELECT (promoters - detractors) / total * 100 FROM surveys",
            )],
            "What is our current NPS?",
            &["7", "6"],
        ),
        sample(
            "11",
            "ARPU",
            "Average Revenue Per User - mean revenue generated per active user",
            Category::Metric,
            Dataset::Finance,
            &["revenue per user", "per-user revenue"],
            vec![sql(
                "s13",
                "Monthly ARPU",
                "SELECT month, SUM(revenue)/COUNT(DISTINCT user_id) FROM transactions GROUP BY month",
            )],
            "What is ARPU this month?",
            &["3", "9"],
        ),
        sample(
            "12",
            "MRR",
            "Monthly Recurring Revenue - predictable revenue earned each month",
            Category::Financial,
            Dataset::Finance,
            &["monthly revenue", "recurring revenue"],
            vec![sql(
                "s14",
                "MRR Growth",
                "SELECT month, SUM(subscription_amount) FROM subscriptions WHERE active = true GROUP BY month",
            )],
            "What is our MRR trend?",
            &["3", "1"],
        ),
    ]
}
