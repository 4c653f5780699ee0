use super::number_format::format_thousands;
use crate::shared::icons::icon;
use contracts::dashboards::d400_sales_overview::{IndicatorStatus, ValueFormat};
use leptos::prelude::*;

fn format_value(val: f64, fmt: &ValueFormat) -> String {
    match fmt {
        ValueFormat::Money { currency } => {
            let sign = match currency.as_str() {
                "EUR" => "€",
                "USD" => "$",
                "GBP" => "£",
                other => other,
            };
            if val.abs() >= 10_000.0 {
                format!("{}{}", sign, format_thousands(val.round() as i64))
            } else {
                format!("{}{:.2}", sign, val)
            }
        }
        ValueFormat::Percent { decimals } => {
            format!("{:.prec$}%", val, prec = *decimals as usize)
        }
        ValueFormat::Integer => format_thousands(val as i64),
    }
}

/// KPI card: label, formatted value and the change against the previous period
#[component]
pub fn StatCard(
    label: String,
    /// Icon name from the icon() helper
    icon_name: String,
    /// None while loading or after a failed read
    #[prop(into)]
    value: Signal<Option<f64>>,
    format: ValueFormat,
    #[prop(into)]
    status: Signal<IndicatorStatus>,
    #[prop(into, optional)]
    change_percent: Signal<Option<f64>>,
    #[prop(into, optional)]
    subtitle: Signal<Option<String>>,
) -> impl IntoView {
    let status_class = move || match status.get() {
        IndicatorStatus::Good => "stat-card stat-card--success",
        IndicatorStatus::Bad => "stat-card stat-card--error",
        IndicatorStatus::Neutral => "stat-card",
    };

    let formatted = move || match value.get() {
        Some(v) => format_value(v, &format),
        None => "—".to_string(),
    };

    let change_view = move || {
        change_percent.get().map(|pct| {
            let (arrow, cls) = if pct > 0.5 {
                ("\u{2191}", "stat-card__change stat-card__change--up")
            } else if pct < -0.5 {
                ("\u{2193}", "stat-card__change stat-card__change--down")
            } else {
                ("", "stat-card__change stat-card__change--flat")
            };
            let text = format!("{}{:.1}%", arrow, pct.abs());
            view! { <span class=cls>{text}</span> }
        })
    };

    let subtitle_view = move || {
        subtitle.get().map(|s| {
            view! { <div class="stat-card__subtitle">{s}</div> }
        })
    };

    view! {
        <div class=status_class>
            <div class="stat-card__icon">
                {icon(&icon_name)}
            </div>
            <div class="stat-card__content">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__value">
                    {formatted}
                    {change_view}
                </div>
                {subtitle_view}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(15.0, &ValueFormat::euro()), "€15.00");
        assert_eq!(format_value(12345.4, &ValueFormat::euro()), "€12\u{00a0}345");
        assert_eq!(format_value(3.0, &ValueFormat::Integer), "3");
        assert_eq!(format_value(-12.345, &ValueFormat::Percent { decimals: 1 }), "-12.3%");
    }
}
