use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use chrono::Utc;
use gloo_timers::callback::Interval;
use strum::IntoEnumIterator;

use crate::{
    application::{
        AnalyzeTokenUseCase, FeedOptions, LiveMarketFeed, LoadNewsUseCase,
        LoadTokenDetailsUseCase, MarketSnapshot, PlaceOrderUseCase, PortfolioService,
    },
    config::AppConfig,
    domain::{
        logging::{LogComponent, get_logger, get_time_provider},
        market_data::{Candle, MarketDataSimulator},
        news::{NewsCategory, extract_source, format_published},
        portfolio::{SortKey, Timeframe, bar_heights, sort_holdings_over},
        tokens::{self, TokenFilter},
        trading::{NotificationQueue, OrderKind, OrderTicket, Side},
    },
    infrastructure::{
        http::NewsHttpClient,
        wallet::{Address, SimulatedWallet, WalletConnector},
    },
};

/// Services shared by every view, handed down through Leptos context
#[derive(Clone)]
pub struct AppServices {
    pub config: AppConfig,
    pub portfolio: PortfolioService,
    pub token_details: LoadTokenDetailsUseCase,
    pub analysis: AnalyzeTokenUseCase,
    pub orders: PlaceOrderUseCase,
    pub notifications: Rc<RefCell<NotificationQueue>>,
    pub news: LoadNewsUseCase,
    pub wallet: SimulatedWallet,
}

impl AppServices {
    pub fn new(config: AppConfig, seed: u64) -> Self {
        let notifications = Rc::new(RefCell::new(NotificationQueue::new(config.notification_capacity)));
        Self {
            portfolio: PortfolioService::new(config.portfolio_delay_ms, seed),
            token_details: LoadTokenDetailsUseCase::new(config.token_delay_ms),
            analysis: AnalyzeTokenUseCase::new(config.analysis_delay_ms, seed.wrapping_add(1)),
            orders: PlaceOrderUseCase::new(notifications.clone(), config.market_order_delay_ms),
            notifications,
            news: LoadNewsUseCase::new(NewsHttpClient::new(config.news_base_url.clone())),
            wallet: SimulatedWallet::new(seed.wrapping_add(2), 500),
            config,
        }
    }
}

impl Default for AppServices {
    fn default() -> Self {
        Self::new(AppConfig::default(), get_time_provider().current_timestamp())
    }
}

fn use_services() -> AppServices {
    use_context::<AppServices>().unwrap_or_else(|| {
        get_logger().warn(LogComponent::Presentation("App"), "No services in context, using defaults");
        AppServices::default()
    })
}

/// Bumped whenever the shared notification queue changes
#[derive(Clone, Copy)]
struct NotificationsChanged(RwSignal<u64>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Portfolio,
    Market,
    Tokens,
    News,
}

#[component]
pub fn App(services: AppServices) -> impl IntoView {
    provide_context(services);
    provide_context(NotificationsChanged(create_rw_signal(0)));
    let (tab, set_tab) = create_signal(Tab::Portfolio);

    let tab_button = move |target: Tab, label: &'static str| {
        view! {
            <button
                class="tab"
                class:active=move || tab.get() == target
                on:click=move |_| set_tab.set(target)
            >
                {label}
            </button>
        }
    };

    view! {
        <style>
            {r#"
            .memecoin-app { font-family: -apple-system, BlinkMacSystemFont, sans-serif; background: #0f0f1a; color: #fff; min-height: 100vh; padding: 20px; }
            .header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 20px; }
            .tab { background: #222236; color: #bbb; border: none; padding: 8px 16px; margin-right: 6px; border-radius: 6px; cursor: pointer; }
            .tab.active { background: #7c3aed; color: #fff; }
            .card { background: #1a1a2e; border-radius: 12px; padding: 16px; margin-bottom: 16px; }
            .stats { display: grid; grid-template-columns: repeat(4, 1fr); gap: 12px; }
            .positive { color: #4ade80; }
            .negative { color: #f87171; }
            .bars { display: flex; align-items: flex-end; height: 120px; gap: 2px; }
            .bar { flex: 1; background: #7c3aed; border-radius: 2px 2px 0 0; }
            .candles { position: relative; display: flex; height: 200px; gap: 1px; }
            .candle { flex: 1; position: relative; }
            .candle .body { position: absolute; left: 20%; right: 20%; }
            .toasts { position: fixed; top: 16px; right: 16px; width: 280px; }
            .toast { background: #222236; border-left: 4px solid #7c3aed; padding: 8px 12px; margin-bottom: 8px; border-radius: 6px; }
            .error { color: #f87171; }
            "#}
        </style>
        <div class="memecoin-app">
            <div class="header">
                <div>
                    {tab_button(Tab::Portfolio, "Portfolio")}
                    {tab_button(Tab::Market, "Trade")}
                    {tab_button(Tab::Tokens, "Tokens")}
                    {tab_button(Tab::News, "News")}
                </div>
                <WalletButton />
            </div>
            {move || match tab.get() {
                Tab::Portfolio => view! { <PortfolioDashboard /> }.into_view(),
                Tab::Market => view! { <MarketPanel /> }.into_view(),
                Tab::Tokens => view! { <TokenDetails /> }.into_view(),
                Tab::News => view! { <NewsFeed /> }.into_view(),
            }}
            <Toasts />
        </div>
    }
}

#[component]
fn WalletButton() -> impl IntoView {
    let wallet = use_services().wallet;
    let (address, set_address) = create_signal::<Option<Address>>(wallet.address());
    let (busy, set_busy) = create_signal(false);

    let toggle = move |_| {
        let wallet = wallet.clone();
        set_busy.set(true);
        spawn_local(async move {
            let result = if address.get_untracked().is_some() {
                wallet.disconnect().await.map(|_| None)
            } else {
                wallet.connect().await.map(Some)
            };
            match result {
                Ok(next) => set_address.set(next),
                Err(e) => get_logger().error(LogComponent::Presentation("Wallet"), &e.to_string()),
            }
            set_busy.set(false);
        });
    };

    view! {
        <button class="tab active" disabled=move || busy.get() on:click=toggle>
            {move || match (busy.get(), address.get()) {
                (true, _) => "Connecting...".to_string(),
                (false, Some(address)) => address.short(),
                (false, None) => "Connect Wallet".to_string(),
            }}
        </button>
    }
}

fn signed_class(value: f64) -> &'static str {
    if value >= 0.0 { "positive" } else { "negative" }
}

#[component]
fn PortfolioDashboard() -> impl IntoView {
    let services = use_services();
    let (timeframe, set_timeframe) = create_signal(Timeframe::Day);
    let (sort_key, set_sort_key) = create_signal(SortKey::Value);

    let portfolio = services.portfolio.clone();
    let snapshot = create_local_resource(
        move || timeframe.get(),
        move |tf| {
            let portfolio = portfolio.clone();
            async move { portfolio.load(tf, SortKey::Value).await }
        },
    );

    view! {
        <div class="card">
            <select on:change=move |ev| {
                if let Ok(tf) = Timeframe::from_str(&event_target_value(&ev)) {
                    set_timeframe.set(tf);
                }
            }>
                {Timeframe::iter().map(|tf| view! { <option value=tf.to_string()>{tf.to_string()}</option> }).collect_view()}
            </select>
            <select on:change=move |ev| {
                if let Ok(key) = SortKey::from_str(&event_target_value(&ev)) {
                    set_sort_key.set(key);
                }
            }>
                {SortKey::iter().map(|key| view! { <option value=key.to_string()>{key.to_string()}</option> }).collect_view()}
            </select>
        </div>
        {move || match snapshot.get() {
            None => view! { <div class="card">"Loading portfolio..."</div> }.into_view(),
            Some(Err(e)) => view! {
                <div class="card error">
                    {e.to_string()}
                    <button on:click=move |_| snapshot.refetch()>"Retry"</button>
                </div>
            }.into_view(),
            Some(Ok(snapshot)) => {
                let stats = snapshot.stats.clone();
                let tf = snapshot.timeframe;
                let holdings = sort_holdings_over(&snapshot.holdings, sort_key.get(), tf);
                view! {
                    <div class="card stats">
                        <div>"Total Value"<h2>{format!("${:.2}", stats.total_value)}</h2></div>
                        <div>{format!("P&L ({tf})")}
                            <h2 class=signed_class(stats.total_pnl)>
                                {format!("${:.2} ({:+.2}%)", stats.total_pnl, stats.total_pnl_percent)}
                            </h2>
                        </div>
                        <div>"Best Performer"
                            <h2>{stats.best_performer.as_ref().map(|h| h.symbol.to_string()).unwrap_or_else(|| "-".to_string())}</h2>
                        </div>
                        <div>"Worst Performer"
                            <h2>{stats.worst_performer.as_ref().map(|h| h.symbol.to_string()).unwrap_or_else(|| "-".to_string())}</h2>
                        </div>
                    </div>
                    <div class="card">
                        <h3>"Risk Distribution"</h3>
                        {stats.risk_distribution.iter().map(|(risk, share)| view! {
                            <div>{format!("{risk}: {share:.1}%")}</div>
                        }).collect_view()}
                    </div>
                    <div class="card">
                        <h3>"30 Day History"</h3>
                        <div class="bars">
                            {bar_heights(&snapshot.history).into_iter().map(|height| view! {
                                <div class="bar" style=format!("height: {height:.1}%")></div>
                            }).collect_view()}
                        </div>
                    </div>
                    <div class="card">
                        <table>
                            <tr><th>"Token"</th><th>"Value"</th><th>"Change"</th><th>"Allocation"</th><th>"Risk"</th></tr>
                            {holdings.into_iter().map(|h| {
                                let change = h.change_for(tf);
                                view! {
                                    <tr>
                                        <td>{format!("{} ({})", h.token, h.symbol)}</td>
                                        <td>{format!("${:.2}", h.value)}</td>
                                        <td class=signed_class(change)>{format!("{change:+.1}%")}</td>
                                        <td>{format!("{:.1}%", h.allocation)}</td>
                                        <td>{h.risk.to_string()}</td>
                                    </tr>
                                }
                            }).collect_view()}
                        </table>
                    </div>
                }.into_view()
            }
        }}
    }
}

/// Top offset and height in percent of the chart for a candle's body and wick
fn candle_geometry(candle: &Candle, low: f64, high: f64) -> ((f64, f64), (f64, f64)) {
    let span = (high - low).max(f64::EPSILON);
    let to_top = |price: f64| (high - price) / span * 100.0;
    let o = candle.ohlcv.open.value();
    let c = candle.ohlcv.close.value();

    let body_top = to_top(o.max(c));
    let body = ((o - c).abs() / span * 100.0).max(0.5);
    let wick_top = to_top(candle.ohlcv.high.value());
    let wick = (candle.ohlcv.high.value() - candle.ohlcv.low.value()) / span * 100.0;
    ((body_top, body), (wick_top, wick))
}

#[component]
fn MarketPanel() -> impl IntoView {
    let services = use_services();
    let changed = use_context::<NotificationsChanged>();
    let (token_id, set_token_id) = create_signal(
        tokens::catalog().first().map(|t| t.id.clone()).unwrap_or_default(),
    );
    let (snapshot, set_snapshot) = create_signal::<Option<MarketSnapshot>>(None);
    let (status, set_status) = create_signal(String::from("Starting feed..."));

    let feed_slot: Rc<RefCell<Option<LiveMarketFeed>>> = Rc::new(RefCell::new(None));
    let config = services.config.clone();
    let slot = feed_slot.clone();
    create_effect(move |_| {
        let id = token_id.get();
        let Some(token) = tokens::catalog().iter().find(|t| t.id == id) else {
            return;
        };
        // replacing the previous feed drops its timer
        slot.borrow_mut().take();

        let simulator = match MarketDataSimulator::new(config.simulator) {
            Ok(simulator) => simulator,
            Err(e) => {
                set_status.set(e.to_string());
                return;
            }
        };
        let options = FeedOptions {
            base_price: token.price,
            candle_count: config.candle_count,
            tick_count: config.tick_count,
            refresh_ms: config.market_refresh_ms,
        };
        let mut feed = LiveMarketFeed::new(simulator, options, get_time_provider().current_timestamp());
        feed.on_update(move |s| set_snapshot.set(Some(s.clone())));
        match feed.start() {
            Ok(()) => set_status.set(format!("LIVE {} every {} s", token.symbol, options.refresh_ms / 1000)),
            Err(e) => set_status.set(e.to_string()),
        }
        *slot.borrow_mut() = Some(feed);
    });
    on_cleanup(move || {
        feed_slot.borrow_mut().take();
    });

    let (kind, set_kind) = create_signal(OrderKind::Market);
    let (side, set_side) = create_signal(Side::Buy);
    let (amount, set_amount) = create_signal(String::new());
    let (limit_price, set_limit_price) = create_signal(String::new());
    let (stop_price, set_stop_price) = create_signal(String::new());

    let ticket = move || OrderTicket {
        kind: kind.get(),
        side: side.get(),
        amount: amount.get().parse().unwrap_or(0.0),
        limit_price: limit_price.get().parse().ok(),
        stop_price: stop_price.get().parse().ok(),
        ..OrderTicket::default()
    };
    let current_price = move || {
        snapshot.with(|s| s.as_ref().and_then(|s| s.last_price).map(|p| p.value()).unwrap_or(0.0))
    };

    let orders = services.orders.clone();
    let place_order = move |_| {
        let orders = orders.clone();
        let symbol = tokens::catalog()
            .iter()
            .find(|t| t.id == token_id.get_untracked())
            .map(|t| t.symbol.clone())
            .unwrap_or_default();
        let ticket = ticket();
        let price = current_price();
        spawn_local(async move {
            if orders.execute(ticket, &symbol, price).await.is_ok() {
                set_amount.set(String::new());
            }
            if let Some(NotificationsChanged(rev)) = changed {
                rev.update(|n| *n += 1);
            }
        });
    };

    view! {
        <div class="card">
            <select on:change=move |ev| set_token_id.set(event_target_value(&ev))>
                {tokens::catalog().iter().map(|t| view! {
                    <option value=t.id.clone()>{format!("{} ({})", t.name, t.symbol)}</option>
                }).collect_view()}
            </select>
            <span>{move || status.get()}</span>
            <h2>{move || format!("${:.6}", current_price())}</h2>
            <div class="candles">
                {move || snapshot.with(|s| {
                    let Some(s) = s else { return ().into_view() };
                    let Some((low, high)) = s.price_range else { return ().into_view() };
                    s.candles.iter().map(|candle| {
                        let ((body_top, body), (wick_top, wick)) =
                            candle_geometry(candle, low.value(), high.value());
                        let color = if candle.is_bullish() { "#4ade80" } else { "#f87171" };
                        view! {
                            <div class="candle">
                                <div style=format!("position:absolute;left:48%;width:1px;top:{wick_top:.2}%;height:{wick:.2}%;background:{color}")></div>
                                <div class="body" style=format!("top:{body_top:.2}%;height:{body:.2}%;background:{color}")></div>
                            </div>
                        }
                    }).collect_view()
                })}
            </div>
        </div>
        <div class="card">
            <h3>"Place Order"</h3>
            <select on:change=move |ev| {
                if let Ok(k) = OrderKind::from_str(&event_target_value(&ev)) {
                    set_kind.set(k);
                }
            }>
                {OrderKind::iter().map(|k| view! { <option value=k.to_string()>{k.to_string()}</option> }).collect_view()}
            </select>
            <select on:change=move |ev| {
                if let Ok(s) = Side::from_str(&event_target_value(&ev)) {
                    set_side.set(s);
                }
            }>
                {Side::iter().map(|s| view! { <option value=s.to_string()>{s.to_string()}</option> }).collect_view()}
            </select>
            <input placeholder="Amount" prop:value=move || amount.get() on:input=move |ev| set_amount.set(event_target_value(&ev)) />
            <Show when=move || kind.get() != OrderKind::Market>
                <input placeholder="Price" prop:value=move || limit_price.get() on:input=move |ev| set_limit_price.set(event_target_value(&ev)) />
            </Show>
            <Show when=move || kind.get() == OrderKind::StopLoss>
                <input placeholder="Stop price" prop:value=move || stop_price.get() on:input=move |ev| set_stop_price.set(event_target_value(&ev)) />
            </Show>
            <div>{move || format!("Estimated value: ${:.4}", ticket().estimated_value(current_price()))}</div>
            <button class="tab active" on:click=place_order>{move || format!("{} {}", side.get(), kind.get())}</button>
        </div>
    }
}

#[component]
fn TokenDetails() -> impl IntoView {
    let services = use_services();
    let (query, set_query) = create_signal(String::new());
    let (filter, set_filter) = create_signal(TokenFilter::Trending);
    let (selected, set_selected) = create_signal(String::from("moondog"));

    let token_details = services.token_details.clone();
    let details = create_local_resource(
        move || selected.get(),
        move |id| {
            let use_case = token_details.clone();
            async move { use_case.execute(&id).await }
        },
    );

    let analysis_use_case = services.analysis.clone();
    let analysis = create_action(move |id: &String| {
        let use_case = analysis_use_case.clone();
        let id = id.clone();
        async move { use_case.execute(&id).await }
    });

    let listed = move || {
        let ordered = tokens::apply_filter(tokens::catalog(), filter.get());
        tokens::search(&ordered, &query.get()).into_iter().cloned().collect::<Vec<_>>()
    };

    view! {
        <div class="card">
            <input placeholder="Search tokens" prop:value=move || query.get() on:input=move |ev| set_query.set(event_target_value(&ev)) />
            {TokenFilter::iter().map(|f| view! {
                <button class="tab" class:active=move || filter.get() == f on:click=move |_| set_filter.set(f)>{f.label()}</button>
            }).collect_view()}
            <For
                each=listed
                key=|t| t.id.clone()
                children=move |t| {
                    let id = t.id.clone();
                    view! {
                        <div on:click=move |_| set_selected.set(id.clone())>
                            {format!("{} ({}) ${:.5} ", t.name, t.symbol, t.price)}
                            <span class=signed_class(t.change_24h)>{format!("{:+.1}%", t.change_24h)}</span>
                        </div>
                    }
                }
            />
        </div>
        {move || match details.get() {
            None => view! { <div class="card">"Loading token..."</div> }.into_view(),
            Some(Err(e)) => view! { <div class="card error">{e.to_string()}</div> }.into_view(),
            Some(Ok(d)) => {
                let id = d.summary.id.clone();
                view! {
                    <div class="card">
                        <h2>{format!("{} ({})", d.summary.name, d.summary.symbol)}</h2>
                        <p>{d.summary.description.clone()}</p>
                        <div>{format!("Supply: {}  Holders: {}", d.total_supply, d.summary.holders)}</div>
                        <div>{format!("Contract: {}", d.contract)}</div>
                        <a href=d.website.clone()>"Website"</a>" "<a href=d.twitter.clone()>"Twitter"</a>" "<a href=d.telegram.clone()>"Telegram"</a>
                        <button class="tab active" on:click=move |_| analysis.dispatch(id.clone())>"Run AI Analysis"</button>
                    </div>
                }.into_view()
            }
        }}
        {move || {
            if analysis.pending().get() {
                return view! { <div class="card">"Analyzing..."</div> }.into_view();
            }
            match analysis.value().get() {
                None => ().into_view(),
                Some(Err(e)) => view! { <div class="card error">{e.to_string()}</div> }.into_view(),
                Some(Ok(a)) => view! {
                    <div class="card">
                        <div>{format!("Sentiment: {} ({:.1})", a.sentiment, a.sentiment_score)}</div>
                        <div>{format!("Risk: {} ({:.1})", a.risk_level, a.risk_score)}</div>
                        <div class=signed_class(a.prediction)>{format!("Prediction: {:+.1}%", a.prediction)}</div>
                        <div>{format!("Confidence: {:.1}%", a.confidence)}</div>
                        <ul>{a.factors.iter().map(|f| view! { <li>{f.clone()}</li> }).collect_view()}</ul>
                    </div>
                }.into_view(),
            }
        }}
    }
}

#[component]
fn NewsFeed() -> impl IntoView {
    let news = use_services().news;
    let (category, set_category) = create_signal(NewsCategory::Memecoins);
    let articles = create_local_resource(
        move || category.get(),
        move |category| {
            let news = news.clone();
            async move { news.execute(category).await }
        },
    );

    view! {
        <div class="card">
            {NewsCategory::iter().map(|c| view! {
                <button class="tab" class:active=move || category.get() == c on:click=move |_| set_category.set(c)>{c.label()}</button>
            }).collect_view()}
        </div>
        {move || match articles.get() {
            None => view! { <div class="card">"Loading news..."</div> }.into_view(),
            Some(Err(e)) => view! {
                <div class="card error">
                    <p>"Failed to load news. Please try again later."</p>
                    <small>{e.to_string()}</small>
                    <button on:click=move |_| articles.refetch()>"Retry"</button>
                </div>
            }.into_view(),
            Some(Ok(list)) if list.is_empty() => view! { <div class="card">"No news available for this category."</div> }.into_view(),
            Some(Ok(list)) => {
                let now = Utc::now();
                list.into_iter().map(|article| view! {
                    <div class="card">
                        <a href=article.url.clone() target="_blank"><h3>{article.title.clone()}</h3></a>
                        <p>{article.content.clone()}</p>
                        <small>{format!("{} • {}", extract_source(&article.url), format_published(article.published_date.as_deref(), now))}</small>
                    </div>
                }).collect_view()
            }
        }}
    }
}

#[component]
fn Toasts() -> impl IntoView {
    let services = use_services();
    let rev = use_context::<NotificationsChanged>()
        .map(|NotificationsChanged(rev)| rev)
        .unwrap_or_else(|| create_rw_signal(0));
    let queue = services.notifications.clone();
    let ttl = u64::from(services.config.notification_ttl_ms);

    let sweeper = {
        let queue = queue.clone();
        Interval::new(1_000, move || {
            let now_ms = get_time_provider().current_timestamp();
            if queue.borrow_mut().expire(now_ms, ttl) > 0 {
                rev.update(|n| *n += 1);
            }
        })
    };
    on_cleanup(move || drop(sweeper));

    view! {
        <div class="toasts">
            {move || {
                rev.get();
                let queue = queue.clone();
                let items: Vec<_> = queue.borrow().items().cloned().collect();
                items.into_iter().map(|n| {
                    let queue = queue.clone();
                    view! {
                        <div class="toast" on:click=move |_| {
                            queue.borrow_mut().dismiss(n.id);
                            rev.update(|v| *v += 1);
                        }>
                            <small>{n.kind.to_string()}</small>
                            <div>{n.message.clone()}</div>
                        </div>
                    }
                }).collect_view()
            }}
        </div>
    }
}
