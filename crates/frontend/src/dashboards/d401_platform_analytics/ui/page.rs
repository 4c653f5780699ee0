use crate::dashboards::d401_platform_analytics::api;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::number_format::{format_euro, format_thousands};
use crate::shared::components::{widget_view, Chart};
use crate::shared::date_utils::format_iso_date;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use crate::shared::refresh::view::LOAD_ERROR;
use crate::shared::refresh::{use_refresh, WidgetState};
use crate::shared::supabase::StoreError;
use chrono::Local;
use contracts::dashboards::d401_platform_analytics::{
    PlatformPerformanceRow, PlatformStatsRow, PlatformSummaryRow, ProductPerformanceRow,
    StatsGranularity, TopProductRow, COMPARISON_TIMEFRAMES,
};
use contracts::domain::a001_platform::Platform;
use contracts::shared::aggregation::{ChartKind, ChartSeries, Metric, WidgetSpec};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

const NO_DATA: &str = "Nessun dato disponibile";
const NO_PRODUCTS: &str = "Nessun prodotto trovato";

fn to_widget<T>(what: &str, result: Result<Vec<T>, StoreError>) -> WidgetState<Vec<T>> {
    match result {
        Ok(rows) => {
            let empty = rows.is_empty();
            WidgetState::ready_or_empty(rows, empty)
        }
        Err(e) => {
            log::error!("Failed to load {}: {}", what, e);
            WidgetState::Failed(LOAD_ERROR.to_string())
        }
    }
}

fn granularity_from_value(value: &str) -> StatsGranularity {
    StatsGranularity::all()
        .into_iter()
        .find(|g| format!("{:?}", g) == value)
        .unwrap_or(StatsGranularity::Daily)
}

/// Per-platform analytics: summary table, stats tabs, comparison chart,
/// distributions and product rankings.
///
/// Reloads whenever a dashboard refresh completes.
#[component]
pub fn PlatformAnalyticsPage() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let refresh = use_refresh();
    let last_refresh = refresh.signals.last_refresh;

    let summary = RwSignal::new(WidgetState::<Vec<PlatformSummaryRow>>::Loading);
    let performance = RwSignal::new(WidgetState::<Vec<PlatformPerformanceRow>>::Loading);
    let top_products = RwSignal::new(WidgetState::<Vec<TopProductRow>>::Loading);
    let stats = RwSignal::new(WidgetState::<Vec<PlatformStatsRow>>::Loading);
    let products = RwSignal::new(WidgetState::<Vec<ProductPerformanceRow>>::Loading);
    let comparison = RwSignal::new(WidgetState::<Vec<ChartSeries>>::Loading);

    let selected_tab = RwSignal::new(format!("{:?}", StatsGranularity::Daily));
    let product_platform = RwSignal::new(String::new());
    let timeframe = RwSignal::new(COMPARISON_TIMEFRAMES[0].to_string());
    let metric = RwSignal::new(Metric::Revenue.token().to_string());
    let chart_kind = RwSignal::new(ChartKind::Line);

    Effect::new(move |_| {
        last_refresh.track();
        let orchestrator = refresh.get();
        let today = orchestrator.today();
        summary.set(WidgetState::Loading);
        performance.set(WidgetState::Loading);
        top_products.set(WidgetState::Loading);
        spawn_local(async move {
            let store = orchestrator.store();
            summary.set(to_widget(
                "platform summary",
                api::load_platform_summary(store, today).await,
            ));
            performance.set(to_widget(
                "platform performance",
                api::load_performance(store).await,
            ));
            top_products.set(to_widget("top products", api::load_top_products(store).await));
        });
    });

    Effect::new(move |_| {
        last_refresh.track();
        let granularity = granularity_from_value(&selected_tab.get());
        let orchestrator = refresh.get();
        stats.set(WidgetState::Loading);
        spawn_local(async move {
            let result = api::load_stats_tab(orchestrator.store(), granularity).await;
            stats.set(to_widget("platform stats", result));
        });
    });

    Effect::new(move |_| {
        last_refresh.track();
        let platform = product_platform.get();
        let orchestrator = refresh.get();
        products.set(WidgetState::Loading);
        spawn_local(async move {
            let filter = Some(platform.as_str()).filter(|p| !p.is_empty());
            let result = api::load_product_performance(orchestrator.store(), filter).await;
            products.set(to_widget("product performance", result));
        });
    });

    Effect::new(move |_| {
        last_refresh.track();
        let days = timeframe.get().parse().unwrap_or(COMPARISON_TIMEFRAMES[0]);
        let metric = Metric::from_token(&metric.get()).unwrap_or(Metric::Revenue);
        let names: Vec<String> = ctx
            .platforms
            .get()
            .into_iter()
            .filter(|p| p.active)
            .map(|p| p.name)
            .collect();
        let orchestrator = refresh.get();
        let today = orchestrator.today();
        comparison.set(WidgetState::Loading);
        spawn_local(async move {
            let result =
                api::load_comparison(orchestrator.store(), days, metric, today, &Local, &names)
                    .await;
            let state = match result {
                Ok(series) => {
                    let empty = series.iter().all(|s| s.values.iter().all(|v| *v == 0.0));
                    WidgetState::ready_or_empty(series, empty)
                }
                Err(e) => {
                    log::error!("Failed to load platform comparison: {}", e);
                    WidgetState::Failed(LOAD_ERROR.to_string())
                }
            };
            comparison.set(state);
        });
    });

    let money_metric = Signal::derive(move || {
        Metric::from_token(&metric.get()).is_some_and(|m| m.is_money())
    });
    let distribution = move |spec: WidgetSpec| {
        Signal::derive(move || {
            performance
                .get()
                .ready()
                .map(|rows| vec![api::distribution(rows, spec)])
                .unwrap_or_default()
        })
    };

    view! {
        <PageFrame page_id="d401_platform_analytics--dashboard" category=PAGE_CAT_DASHBOARD>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Analisi piattaforme"</h1>
                </div>
            </div>

            <div class="page__content">
                <Card>
                    <div class="card__header">
                        <h3>"Riepilogo piattaforme"</h3>
                    </div>
                    {move || widget_view(summary.get(), NO_DATA, |rows| view! { <SummaryTable rows=rows /> })}
                </Card>

                <Card>
                    <div class="card__header">
                        <h3>"Statistiche per periodo"</h3>
                        <TabList selected_value=selected_tab>
                            {StatsGranularity::all().into_iter().map(|g| view! {
                                <Tab value=format!("{:?}", g)>{g.label()}</Tab>
                            }).collect_view()}
                        </TabList>
                    </div>
                    {move || {
                        let granularity = granularity_from_value(&selected_tab.get());
                        widget_view(stats.get(), NO_DATA, move |rows| view! {
                            <StatsTable rows=rows granularity=granularity />
                        })
                    }}
                </Card>

                <Card>
                    <div class="card__header">
                        <h3>"Confronto piattaforme"</h3>
                        <Flex gap=FlexGap::Small>
                            <Select value=timeframe>
                                {COMPARISON_TIMEFRAMES.iter().map(|days| view! {
                                    <option value=days.to_string()>{format!("Ultimi {} giorni", days)}</option>
                                }).collect_view()}
                            </Select>
                            <Select value=metric>
                                {[Metric::Revenue, Metric::Count, Metric::Average].into_iter().map(|m| view! {
                                    <option value=m.token()>{m.label()}</option>
                                }).collect_view()}
                            </Select>
                            <Button
                                appearance=move || if chart_kind.get() == ChartKind::Line { ButtonAppearance::Primary } else { ButtonAppearance::Subtle }
                                on_click=move |_| chart_kind.set(ChartKind::Line)
                            >
                                "Linee"
                            </Button>
                            <Button
                                appearance=move || if chart_kind.get() == ChartKind::Bar { ButtonAppearance::Primary } else { ButtonAppearance::Subtle }
                                on_click=move |_| chart_kind.set(ChartKind::Bar)
                            >
                                "Barre"
                            </Button>
                        </Flex>
                    </div>
                    {move || {
                        let money = money_metric.get();
                        widget_view(comparison.get(), NO_DATA, move |series| view! {
                            <Chart kind=chart_kind series=series money=money />
                        })
                    }}
                </Card>

                <div class="dashboard-grid">
                    <Card>
                        <div class="card__header">
                            <h3>{WidgetSpec::REVENUE_DISTRIBUTION.title}</h3>
                        </div>
                        {move || widget_view(performance.get(), NO_DATA, move |_| view! {
                            <Chart kind=ChartKind::Doughnut series=distribution(WidgetSpec::REVENUE_DISTRIBUTION) money=true />
                        })}
                    </Card>
                    <Card>
                        <div class="card__header">
                            <h3>{WidgetSpec::SALES_DISTRIBUTION.title}</h3>
                        </div>
                        {move || widget_view(performance.get(), NO_DATA, move |_| view! {
                            <Chart kind=ChartKind::Doughnut series=distribution(WidgetSpec::SALES_DISTRIBUTION) />
                        })}
                    </Card>
                </div>

                <Card>
                    <div class="card__header">
                        <h3>"Prodotti più venduti"</h3>
                    </div>
                    {move || widget_view(top_products.get(), NO_PRODUCTS, |rows| view! { <TopProductsTable rows=rows /> })}
                </Card>

                <Card>
                    <div class="card__header">
                        <h3>"Prodotti per piattaforma"</h3>
                        <Select value=product_platform>
                            <option value="">"Tutte le piattaforme"</option>
                            {move || ctx.platforms.get().into_iter().map(|p: Platform| {
                                let value = p.name.clone();
                                view! { <option value=value>{p.name}</option> }
                            }).collect_view()}
                        </Select>
                    </div>
                    {move || widget_view(products.get(), NO_PRODUCTS, |rows| view! { <ProductPerformanceTable rows=rows /> })}
                </Card>
            </div>
        </PageFrame>
    }
}

#[component]
fn SummaryTable(rows: Vec<PlatformSummaryRow>) -> impl IntoView {
    view! {
        <Table>
            <TableHeader>
                <TableRow>
                    <TableHeaderCell>"Piattaforma"</TableHeaderCell>
                    <TableHeaderCell>"Oggi"</TableHeaderCell>
                    <TableHeaderCell>"Mese"</TableHeaderCell>
                    <TableHeaderCell>"Anno"</TableHeaderCell>
                    <TableHeaderCell>"Prodotti"</TableHeaderCell>
                </TableRow>
            </TableHeader>
            <TableBody>
                {rows.into_iter().map(|row| {
                    let color = Platform::color(&row.name);
                    let initials = row.name.chars().take(2).collect::<String>().to_uppercase();
                    view! {
                        <TableRow>
                            <TableCell>
                                <TableCellLayout>
                                    <div class="platform-info">
                                        <div class="platform-logo" style=format!("background: {};", color)>{initials}</div>
                                        <span>{row.name.clone()}</span>
                                    </div>
                                </TableCellLayout>
                            </TableCell>
                            <TableCell><TableCellLayout>{figures(row.today.sales, row.today.revenue)}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{figures(row.month.sales, row.month.revenue)}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{figures(row.year.sales, row.year.revenue)}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{format_thousands(row.unique_products as i64)}</TableCellLayout></TableCell>
                        </TableRow>
                    }
                }).collect_view()}
            </TableBody>
        </Table>
    }
}

fn figures(sales: u64, revenue: f64) -> String {
    format!("{} / {}", sales, format_euro(revenue))
}

#[component]
fn StatsTable(rows: Vec<PlatformStatsRow>, granularity: StatsGranularity) -> impl IntoView {
    view! {
        <Table>
            <TableHeader>
                <TableRow>
                    <TableHeaderCell>"Periodo"</TableHeaderCell>
                    <TableHeaderCell>"Piattaforma"</TableHeaderCell>
                    <TableHeaderCell>"Vendite"</TableHeaderCell>
                    <TableHeaderCell>"Totale"</TableHeaderCell>
                    <TableHeaderCell>"Media"</TableHeaderCell>
                    <TableHeaderCell>"Min"</TableHeaderCell>
                    <TableHeaderCell>"Max"</TableHeaderCell>
                </TableRow>
            </TableHeader>
            <TableBody>
                {rows.into_iter().map(|row| {
                    let period = match granularity {
                        StatsGranularity::Daily => format_iso_date(&row.period_label(granularity)),
                        _ => row.period_label(granularity),
                    };
                    view! {
                        <TableRow>
                            <TableCell><TableCellLayout>{period}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{row.platform_name.clone()}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{row.total_sales}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout><span class="amount">{format_euro(row.total_amount)}</span></TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{format_euro(row.avg_amount)}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{format_euro(row.min_amount)}</TableCellLayout></TableCell>
                            <TableCell><TableCellLayout>{format_euro(row.max_amount)}</TableCellLayout></TableCell>
                        </TableRow>
                    }
                }).collect_view()}
            </TableBody>
        </Table>
    }
}

#[component]
fn TopProductsTable(rows: Vec<TopProductRow>) -> impl IntoView {
    view! {
        <Table>
            <TableHeader>
                <TableRow>
                    <TableHeaderCell>"#"</TableHeaderCell>
                    <TableHeaderCell>"Prodotto"</TableHeaderCell>
                    <TableHeaderCell>"Vendite"</TableHeaderCell>
                    <TableHeaderCell>"Fatturato"</TableHeaderCell>
                    <TableHeaderCell>"Prezzo medio"</TableHeaderCell>
                    <TableHeaderCell>"Piattaforme"</TableHeaderCell>
                </TableRow>
            </TableHeader>
            <TableBody>
                {rows.into_iter().enumerate().map(|(i, row)| view! {
                    <TableRow>
                        <TableCell><TableCellLayout>{i + 1}</TableCellLayout></TableCell>
                        <TableCell>
                            <TableCellLayout truncate=true>
                                {row.product_name.unwrap_or_else(|| "N/A".to_string())}
                            </TableCellLayout>
                        </TableCell>
                        <TableCell><TableCellLayout>{row.total_sales}</TableCellLayout></TableCell>
                        <TableCell><TableCellLayout><span class="amount">{format_euro(row.total_revenue)}</span></TableCellLayout></TableCell>
                        <TableCell><TableCellLayout>{format_euro(row.avg_price)}</TableCellLayout></TableCell>
                        <TableCell><TableCellLayout truncate=true>{row.platforms.unwrap_or_default()}</TableCellLayout></TableCell>
                    </TableRow>
                }).collect_view()}
            </TableBody>
        </Table>
    }
}

#[component]
fn ProductPerformanceTable(rows: Vec<ProductPerformanceRow>) -> impl IntoView {
    let date = |raw: Option<String>| raw.map(|d| format_iso_date(&d)).unwrap_or_default();
    view! {
        <Table>
            <TableHeader>
                <TableRow>
                    <TableHeaderCell>"Prodotto"</TableHeaderCell>
                    <TableHeaderCell>"Piattaforma"</TableHeaderCell>
                    <TableHeaderCell>"Vendite"</TableHeaderCell>
                    <TableHeaderCell>"Fatturato"</TableHeaderCell>
                    <TableHeaderCell>"Prezzo medio"</TableHeaderCell>
                    <TableHeaderCell>"Prima vendita"</TableHeaderCell>
                    <TableHeaderCell>"Ultima vendita"</TableHeaderCell>
                </TableRow>
            </TableHeader>
            <TableBody>
                {rows.into_iter().map(|row| view! {
                    <TableRow>
                        <TableCell>
                            <TableCellLayout truncate=true>
                                {row.product_name.unwrap_or_else(|| "N/A".to_string())}
                            </TableCellLayout>
                        </TableCell>
                        <TableCell>
                            <TableCellLayout>
                                <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                                    {row.platform_name.unwrap_or_default()}
                                </Badge>
                            </TableCellLayout>
                        </TableCell>
                        <TableCell><TableCellLayout>{row.times_sold}</TableCellLayout></TableCell>
                        <TableCell><TableCellLayout><span class="amount">{format_euro(row.total_revenue)}</span></TableCellLayout></TableCell>
                        <TableCell><TableCellLayout>{format_euro(row.avg_price)}</TableCellLayout></TableCell>
                        <TableCell><TableCellLayout>{date(row.first_sale)}</TableCellLayout></TableCell>
                        <TableCell><TableCellLayout>{date(row.last_sale)}</TableCellLayout></TableCell>
                    </TableRow>
                }).collect_view()}
            </TableBody>
        </Table>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_from_tab_value() {
        assert_eq!(granularity_from_value("Monthly"), StatsGranularity::Monthly);
        assert_eq!(granularity_from_value("Yearly"), StatsGranularity::Yearly);
        assert_eq!(granularity_from_value(""), StatsGranularity::Daily);
    }

    #[test]
    fn test_failed_load_shows_generic_message() {
        let state = to_widget::<u8>("x", Err(StoreError::Network("offline".to_string())));
        assert_eq!(state, WidgetState::Failed(LOAD_ERROR.to_string()));
        assert_eq!(to_widget::<u8>("x", Ok(vec![])), WidgetState::Empty);
    }
}
