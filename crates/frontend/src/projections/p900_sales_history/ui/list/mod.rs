mod pager;

use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::number_format::{format_euro, format_thousands};
use crate::shared::components::{widget_view, PeriodSelector, SearchInput};
use crate::shared::config::Config;
use crate::shared::date_utils::format_datetime;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::shared::refresh::{use_refresh, WidgetState};
use chrono::{Local, TimeZone};
use contracts::domain::a001_platform::Platform;
use contracts::domain::a002_sale::Sale;
use contracts::projections::p900_sales_history::{HistoryFilter, HistoryPage, HistoryPaging};
use contracts::shared::period::PeriodKind;
use leptos::prelude::*;
use pager::HistoryPager;
use thaw::*;

const NO_RESULTS: &str = "Nessun risultato trovato";

/// Cell texts of one table row, owned so the row view can move them
#[derive(Debug, PartialEq)]
struct HistoryRow {
    date: String,
    platform: String,
    product: String,
    amount: String,
    currency: String,
}

impl HistoryRow {
    fn new<Tz>(sale: Sale, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            date: format_datetime(&sale.sale_date, tz),
            platform: sale.platform_name().to_string(),
            product: sale.product_label().to_string(),
            amount: format_euro(sale.amount),
            currency: sale.currency,
        }
    }
}

/// Pager position for a history load; `None` while loading or failed, so
/// the bar keeps showing the last known position
fn pager_state(state: &WidgetState<HistoryPage>, requested: HistoryPaging) -> Option<(HistoryPaging, u64)> {
    match state {
        WidgetState::Ready(page) => Some((page.paging(), page.total_count)),
        WidgetState::Empty => Some((HistoryPaging::first(requested.page_size), 0)),
        _ => None,
    }
}

/// Paginated, filterable list of every recorded sale
#[component]
pub fn SalesHistoryList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let refresh = use_refresh();
    let history = refresh.signals.history;
    let debounce_ms = use_context::<Config>()
        .map(|c| c.dashboard.search_debounce_ms)
        .unwrap_or(500);

    let (initial_filter, initial_paging) = {
        let orchestrator = refresh.get();
        let state = orchestrator.state();
        let filter = state.history.borrow().clone();
        (filter, state.paging.get())
    };
    let initial_period = initial_filter
        .period
        .as_ref()
        .filter(|p| !p.is_custom())
        .map(|p| p.token())
        .unwrap_or_else(|| "all".to_string());

    let platform_filter = RwSignal::new(initial_filter.platform.clone().unwrap_or_default());
    let paging = RwSignal::new(initial_paging);
    let total_count = RwSignal::new(0u64);

    Effect::new(move |_| {
        if let Some((position, total)) = pager_state(&history.get(), paging.get_untracked()) {
            paging.set(position);
            total_count.set(total);
        }
    });

    let apply = move |update: &dyn Fn(&mut HistoryFilter)| {
        let orchestrator = refresh.get();
        let mut filter = orchestrator.state().history.borrow().clone();
        update(&mut filter);
        log::debug!("History filter: {:?}", filter);
        orchestrator.state().set_history_filter(filter);
        refresh.refresh_history();
    };

    // Skip the first run: the current filter is already loaded
    Effect::new(move |prev: Option<()>| {
        let platform = platform_filter.get();
        if prev.is_some() {
            apply(&|f| f.platform = Some(platform.clone()).filter(|p| !p.is_empty()));
        }
    });

    let on_period_change = Callback::new(move |period: Option<PeriodKind>| {
        apply(&|f| f.period = period.clone());
    });

    let on_search = Callback::new(move |search: String| {
        apply(&|f| f.search = search.clone());
    });

    let on_paging_change = Callback::new(move |next: HistoryPaging| {
        refresh.get().state().set_paging(next);
        paging.set(next);
        refresh.refresh_history();
    });

    view! {
        <PageFrame page_id="p900_sales_history--list" category=PAGE_CAT_LIST>
            <div class="page__header">
                <div class="page__header-left">
                    <h1 class="page__title">"Storico vendite"</h1>
                    <Badge appearance=BadgeAppearance::Tint>
                        {move || format_thousands(total_count.get() as i64)}
                    </Badge>
                </div>
                <div class="page__header-right">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| refresh.refresh_history()
                        disabled=Signal::derive(move || history.get().is_loading())
                    >
                        {move || if history.get().is_loading() { "Caricamento..." } else { "Aggiorna" }}
                    </Button>
                </div>
            </div>

            <div class="page__content">
                <div class="filter-panel">
                    <div class="filter-panel-content">
                        <Flex gap=FlexGap::Small align=FlexAlign::End>
                            <div style="width: 200px;">
                                <Flex vertical=true gap=FlexGap::Small>
                                    <Label>"Piattaforma:"</Label>
                                    <Select value=platform_filter>
                                        <option value="">"Tutte"</option>
                                        {move || ctx.platforms.get().into_iter().map(|p: Platform| {
                                            let value = p.name.clone();
                                            view! { <option value=value>{p.name}</option> }
                                        }).collect_view()}
                                    </Select>
                                </Flex>
                            </div>
                            <Flex vertical=true gap=FlexGap::Small>
                                <Label>"Periodo:"</Label>
                                <PeriodSelector
                                    options=vec![
                                        PeriodKind::Today,
                                        PeriodKind::Yesterday,
                                        PeriodKind::MonthToDate,
                                        PeriodKind::YearToDate,
                                    ]
                                    allow_all=true
                                    initial=initial_period
                                    on_change=on_period_change
                                />
                            </Flex>
                            <div style="width: 260px;">
                                <Flex vertical=true gap=FlexGap::Small>
                                    <Label>"Prodotto:"</Label>
                                    <SearchInput
                                        on_change=on_search
                                        placeholder="Cerca prodotto..."
                                        debounce_ms=debounce_ms
                                    />
                                </Flex>
                            </div>
                        </Flex>
                    </div>
                    <div class="filter-panel-header">
                        <div class="filter-panel-header__left">
                            {move || history.get().ready().map(|page| view! {
                                <span class="history-summary">
                                    {format!(
                                        "{}-{} di {} vendite, totale pagina {}",
                                        page.first_row(),
                                        page.last_row(),
                                        page.total_count,
                                        format_euro(page.page_amount()),
                                    )}
                                </span>
                            })}
                        </div>
                        <div class="filter-panel-header__center">
                            <HistoryPager
                                paging=paging
                                total_count=total_count
                                on_change=on_paging_change
                            />
                        </div>
                    </div>
                </div>

                {move || widget_view(history.get(), NO_RESULTS, |page| view! {
                    <div class="table-wrapper">
                        <Table attr:style="width: 100%;">
                            <TableHeader>
                                <TableRow>
                                    <TableHeaderCell>"Data"</TableHeaderCell>
                                    <TableHeaderCell>"Piattaforma"</TableHeaderCell>
                                    <TableHeaderCell>"Prodotto"</TableHeaderCell>
                                    <TableHeaderCell>"Importo"</TableHeaderCell>
                                    <TableHeaderCell>"Valuta"</TableHeaderCell>
                                </TableRow>
                            </TableHeader>
                            <TableBody>
                                {page.rows.into_iter().map(|sale| {
                                    let HistoryRow { date, platform, product, amount, currency } =
                                        HistoryRow::new(sale, &Local);
                                    view! {
                                        <TableRow>
                                            <TableCell><TableCellLayout>{date}</TableCellLayout></TableCell>
                                            <TableCell>
                                                <TableCellLayout>
                                                    <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Brand>
                                                        {platform}
                                                    </Badge>
                                                </TableCellLayout>
                                            </TableCell>
                                            <TableCell><TableCellLayout truncate=true>{product}</TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout><span class="amount">{amount}</span></TableCellLayout></TableCell>
                                            <TableCell><TableCellLayout>{currency}</TableCellLayout></TableCell>
                                        </TableRow>
                                    }
                                }).collect_view()}
                            </TableBody>
                        </Table>
                    </div>
                })}
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::refresh::testing::sale;
    use chrono::Utc;

    fn page(page: u64, total: u64) -> HistoryPage {
        HistoryPage {
            rows: Vec::new(),
            total_count: total,
            page,
            page_size: 20,
        }
    }

    #[test]
    fn test_pager_follows_loaded_page() {
        let (paging, total) =
            pager_state(&WidgetState::Ready(page(3, 45)), HistoryPaging::first(20)).unwrap();
        assert_eq!(paging, HistoryPaging { page: 3, page_size: 20 });
        assert_eq!(total, 45);
    }

    #[test]
    fn test_row_cells_own_every_text() {
        let at = Utc.with_ymd_and_hms(2024, 6, 15, 9, 5, 0).unwrap();
        let mut sold = sale("", "Dragon", 12.5, at);
        sold.currency = "USD".to_string();
        assert_eq!(
            HistoryRow::new(sold, &Utc),
            HistoryRow {
                date: "15/06/2024 09:05".to_string(),
                platform: "Unknown".to_string(),
                product: "Dragon".to_string(),
                amount: "€12.50".to_string(),
                currency: "USD".to_string(),
            }
        );
    }

    #[test]
    fn test_pager_keeps_position_while_loading() {
        let requested = HistoryPaging { page: 2, page_size: 50 };
        assert_eq!(pager_state(&WidgetState::Loading, requested), None);
        assert_eq!(
            pager_state(&WidgetState::Failed("x".to_string()), requested),
            None
        );
        let (paging, total) = pager_state(&WidgetState::Empty, requested).unwrap();
        assert_eq!(paging, HistoryPaging::first(50));
        assert_eq!(total, 0);
    }
}
