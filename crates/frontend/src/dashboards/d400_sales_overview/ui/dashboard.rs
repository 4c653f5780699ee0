use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::number_format::format_euro;
use crate::shared::components::{widget_view, Chart, PeriodSelector, StatCard};
use crate::shared::date_utils::format_datetime;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use crate::shared::refresh::use_refresh;
use chrono::Local;
use contracts::dashboards::d400_sales_overview::dto::RECENT_SALES_LIMITS;
use contracts::dashboards::d400_sales_overview::{IndicatorStatus, ValueFormat};
use contracts::domain::a001_platform::Platform;
use contracts::shared::aggregation::{ChartKind, ChartSeries};
use contracts::shared::period::PeriodKind;
use leptos::prelude::*;
use thaw::*;

const NO_SALES_TODAY: &str = "Nessuna vendita oggi";

/// Overview: KPI cards, sales trend, today's platforms and the latest sales
#[component]
pub fn SalesOverviewDashboard() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let refresh = use_refresh();
    let signals = refresh.signals;

    let (initial_period, initial_limit) = {
        let orchestrator = refresh.get();
        let overview = orchestrator.state().overview.borrow();
        (overview.trend_period.token(), overview.recent_limit)
    };

    let on_platform_change = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        log::debug!("Dashboard platform filter: '{}'", value);
        refresh.get().state().set_platform(Some(value));
        refresh.refresh_overview();
    };

    let on_period_change = Callback::new(move |period: Option<PeriodKind>| {
        if let Some(period) = period {
            refresh.get().state().set_trend_period(period);
            refresh.refresh_trend();
        }
    });

    let on_limit_change = move |ev: leptos::ev::Event| {
        let limit = event_target_value(&ev).parse().unwrap_or(RECENT_SALES_LIMITS[0]);
        refresh.get().state().set_recent_limit(limit);
        refresh.refresh_recent_sales();
    };

    let kpi = move |f: fn(&contracts::dashboards::d400_sales_overview::KpiSnapshot) -> f64| {
        Signal::derive(move || signals.kpis.get().ready().map(f))
    };
    let change = Signal::derive(move || {
        signals
            .kpis
            .get()
            .ready()
            .and_then(|k| k.day_over_day_percent())
    });
    let today_status = Signal::derive(move || IndicatorStatus::by_change(change.get()));
    let yesterday_subtitle = Signal::derive(move || {
        signals.kpis.get().ready().map(|k| {
            format!("Ieri: {} vendite, {}", k.yesterday_count, format_euro(k.yesterday_amount))
        })
    });

    let trend_series = Signal::derive(move || {
        signals
            .trend
            .get()
            .ready()
            .cloned()
            .map(|s| vec![s])
            .unwrap_or_default()
    });

    view! {
        <PageFrame page_id="d400_sales_overview--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Dashboard"</h1>
                </div>
                <div class="page__header-right">
                    <select class="filter-select" on:change=on_platform_change>
                        <option value="">"Tutte le piattaforme"</option>
                        {move || {
                            ctx.platforms
                                .get()
                                .into_iter()
                                .map(|p: Platform| {
                                    let id = p.id.value().to_string();
                                    view! { <option value=id>{p.name}</option> }
                                })
                                .collect_view()
                        }}
                    </select>
                    <Button appearance=ButtonAppearance::Subtle on_click=move |_| refresh.refresh_all()>
                        {icon("refresh")}
                        "Aggiorna"
                    </Button>
                </div>
            </div>

            <div class="page__content">
                {move || signals.kpis.get().error().map(|e| view! {
                    <div class="warning-box warning-box--error">
                        <span class="warning-box__icon">"⚠"</span>
                        <span class="warning-box__text">{e.to_string()}</span>
                    </div>
                })}
                <div class="stat-cards">
                    <StatCard
                        label="Vendite oggi".to_string()
                        icon_name="shopping-cart".to_string()
                        value=kpi(|k| k.today_count as f64)
                        format=ValueFormat::Integer
                        status=Signal::derive(|| IndicatorStatus::Neutral)
                        subtitle=yesterday_subtitle
                    />
                    <StatCard
                        label="Fatturato oggi".to_string()
                        icon_name="euro".to_string()
                        value=kpi(|k| k.today_amount)
                        format=ValueFormat::euro()
                        status=today_status
                        change_percent=change
                    />
                    <StatCard
                        label="Fatturato mese".to_string()
                        icon_name="calendar".to_string()
                        value=kpi(|k| k.month_amount)
                        format=ValueFormat::euro()
                        status=Signal::derive(|| IndicatorStatus::Neutral)
                    />
                    <StatCard
                        label="Fatturato anno".to_string()
                        icon_name="trending-up".to_string()
                        value=kpi(|k| k.year_amount)
                        format=ValueFormat::euro()
                        status=Signal::derive(|| IndicatorStatus::Neutral)
                    />
                </div>

                <div class="dashboard-grid">
                    <Card>
                        <div class="card__header">
                            <h3>"Andamento vendite"</h3>
                            <PeriodSelector
                                options=vec![
                                    PeriodKind::Today,
                                    PeriodKind::Yesterday,
                                    PeriodKind::last_days(7),
                                    PeriodKind::last_days(30),
                                ]
                                initial=initial_period
                                on_change=on_period_change
                            />
                        </div>
                        {move || {
                            let state = signals.trend.get();
                            widget_view(state, "Nessun dato disponibile", move |_series: ChartSeries| view! {
                                <Chart kind=ChartKind::Line series=trend_series money=true />
                            })
                        }}
                    </Card>

                    <Card>
                        <div class="card__header">
                            <h3>"Piattaforme oggi"</h3>
                        </div>
                        {move || widget_view(signals.top_platforms.get(), NO_SALES_TODAY, |buckets| view! {
                            <div class="platform-list">
                                {buckets.into_iter().map(|b| {
                                    let initials = b.key.chars().take(2).collect::<String>().to_uppercase();
                                    let color = Platform::color(&b.key);
                                    view! {
                                        <div class="platform-item">
                                            <div class="platform-info">
                                                <div class="platform-logo" style=format!("background: {};", color)>{initials}</div>
                                                <div>
                                                    <div class="platform-item__name">{b.key.clone()}</div>
                                                    <div class="platform-item__count">{format!("{} vendite", b.count)}</div>
                                                </div>
                                            </div>
                                            <div class="platform-item__total">{format_euro(b.total)}</div>
                                        </div>
                                    }
                                }).collect_view()}
                            </div>
                        })}
                    </Card>
                </div>

                <Card>
                    <div class="card__header">
                        <h3>"Vendite recenti"</h3>
                        <select class="filter-select" on:change=on_limit_change>
                            {RECENT_SALES_LIMITS.iter().map(|&limit| view! {
                                <option value=limit.to_string() selected={limit == initial_limit}>
                                    {format!("Ultime {}", limit)}
                                </option>
                            }).collect_view()}
                        </select>
                    </div>
                    {move || widget_view(signals.recent_sales.get(), NO_SALES_TODAY, |sales| view! {
                        <Table>
                            <TableHeader>
                                <TableRow>
                                    <TableHeaderCell>"Piattaforma"</TableHeaderCell>
                                    <TableHeaderCell>"Prodotto"</TableHeaderCell>
                                    <TableHeaderCell>"Data"</TableHeaderCell>
                                    <TableHeaderCell>"Importo"</TableHeaderCell>
                                </TableRow>
                            </TableHeader>
                            <TableBody>
                                {sales.into_iter().map(|sale| {
                                    let platform = sale.platform_name().to_string();
                                    let product = sale.product_label().to_string();
                                    let date = format_datetime(&sale.sale_date, &Local);
                                    let amount = format_euro(sale.amount);
                                    view! {
                                        <TableRow>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                                                        {platform}
                                                    </Badge>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell><TableCellLayout truncate=true>{product}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout>{date}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout><span class="amount">{amount}</span></TableCellLayout></TableCell>
                                        </TableRow>
                                    }
                                }).collect_view()}
                            </TableBody>
                        </Table>
                    })}
                </Card>
            </div>
        </PageFrame>
    }
}
