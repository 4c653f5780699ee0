use crate::domain::a001_platform::api::active_platforms;
use crate::domain::a002_sale::api::{submit_sale, SubmitError};
use crate::layout::global_context::AppGlobalContext;
use crate::shared::refresh::use_refresh;
use contracts::domain::a002_sale::{Currency, NewSaleForm};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

/// Manual sale entry.
///
/// Validation errors stay in the dialog; store errors are reported by the
/// flow through a toast and keep the dialog open.
#[component]
pub fn NewSaleDialog(open: RwSignal<bool>) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let refresh = use_refresh();

    let platform_id = RwSignal::new(String::new());
    let product_name = RwSignal::new(String::new());
    let amount = RwSignal::new(String::new());
    let currency = RwSignal::new(Currency::Eur.code().to_string());
    let error = RwSignal::new(None::<String>);
    let saving = RwSignal::new(false);

    let reset = move || {
        platform_id.set(String::new());
        product_name.set(String::new());
        amount.set(String::new());
        currency.set(Currency::Eur.code().to_string());
        error.set(None);
    };

    let close = move || {
        open.set(false);
        reset();
    };

    let on_save = move |_| {
        if saving.get_untracked() {
            return;
        }
        let form = NewSaleForm {
            platform_id: platform_id.get_untracked(),
            product_name: product_name.get_untracked(),
            amount: amount.get_untracked(),
            currency: Currency::from_code(&currency.get_untracked()).unwrap_or_default(),
        };
        let orchestrator = refresh.get();
        saving.set(true);
        error.set(None);
        spawn_local(async move {
            match submit_sale(&orchestrator, &form).await {
                Ok(_) => {
                    refresh.mark_refreshed();
                    close();
                }
                Err(SubmitError::Invalid(e)) => error.set(Some(e.to_string())),
                Err(SubmitError::Store(_)) => {}
            }
            saving.set(false);
        });
    };

    view! {
        <Dialog open=open>
            <DialogSurface>
                <DialogBody>
                    <DialogTitle>"Aggiungi vendita"</DialogTitle>
                    <DialogContent>
                        <Flex vertical=true gap=FlexGap::Medium>
                            <div class="form__group">
                                <Label>"Piattaforma"</Label>
                                <Select value=platform_id>
                                    <option value="">"Seleziona piattaforma..."</option>
                                    {move || {
                                        active_platforms(&ctx.platforms.get())
                                            .into_iter()
                                            .map(|p| {
                                                let id = p.id.value().to_string();
                                                view! { <option value=id>{p.name}</option> }
                                            })
                                            .collect_view()
                                    }}
                                </Select>
                            </div>
                            <div class="form__group">
                                <Label>"Prodotto"</Label>
                                <Input value=product_name placeholder="Nome del modello" />
                            </div>
                            <Flex gap=FlexGap::Small>
                                <div class="form__group">
                                    <Label>"Importo"</Label>
                                    <Input value=amount placeholder="0.00" />
                                </div>
                                <div class="form__group">
                                    <Label>"Valuta"</Label>
                                    <Select value=currency>
                                        {Currency::all()
                                            .into_iter()
                                            .map(|c| view! { <option value=c.code()>{format!("{} ({})", c.code(), c.symbol())}</option> })
                                            .collect_view()}
                                    </Select>
                                </div>
                            </Flex>
                            {move || error.get().map(|e| view! {
                                <div class="warning-box warning-box--error">
                                    <span class="warning-box__icon">"⚠"</span>
                                    <span class="warning-box__text">{e}</span>
                                </div>
                            })}
                        </Flex>
                    </DialogContent>
                    <DialogActions>
                        <Button
                            appearance=ButtonAppearance::Primary
                            on_click=on_save
                            loading=saving
                        >
                            "Salva"
                        </Button>
                        <Button appearance=ButtonAppearance::Subtle on_click=move |_| close()>
                            "Annulla"
                        </Button>
                    </DialogActions>
                </DialogBody>
            </DialogSurface>
        </Dialog>
    }
}
