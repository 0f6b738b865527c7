use std::process;
use std::str::FromStr;

use aggregator_models::constants::chains::{ChainId, NATIVE_TOKEN_EVM_ADDRESS};
use aggregator_models::log::init_tracing;
use swap_params_rust::config::SwapParamsConfig;
use swap_params_rust::error::ReportDisplayExt;
use swap_params_rust::models::fee::{ChargeFeeBy, FeeConfig};
use swap_params_rust::models::intent::{MinAmountOut, SwapIntent, TokenSpec, TradeOptions};
use swap_params_rust::models::route::{DEFAULT_CUSTOM_TRADE_ROUTE, RouteSource};
use swap_params_rust::models::swap::AssembledSwap;
use swap_params_rust::routers::constants::{DEFAULT_DEADLINE_MINUTES, KYBERSWAP_ROUTER_ADDRESS};
use swap_params_rust::routers::kyberswap::kyberswap::KyberSwapClient;
use swap_params_rust::session::{SessionState, SwapForm, SwapSession};
use swap_params_rust::utils::limit_amount::parse_slippage;
use swap_params_rust::utils::number_conversion::denormalize;
use tokio::io::{self, AsyncBufReadExt, BufReader};

const KNC_BSC_ADDRESS: &str = "0xfe56d5892BDffC7BF58f2E84BE1b2C32D21C308b";
const DEFAULT_RECIPIENT: &str = "0x16368dD7e94f177B8C2c028Ef42289113D328121";

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("swap_params error: {err}");
        process::exit(1);
    }
}

fn default_form() -> SwapForm {
    SwapForm {
        intent: SwapIntent {
            chain_id: ChainId::Bsc,
            token_in: TokenSpec {
                address: NATIVE_TOKEN_EVM_ADDRESS.to_string(),
                decimals: 18,
            },
            token_out: TokenSpec {
                address: KNC_BSC_ADDRESS.to_string(),
                decimals: 18,
            },
            amount_in: "0.000001".to_string(),
        },
        fee_config: None,
        options: TradeOptions {
            slippage: rust_decimal::Decimal::new(5, 1),
            min_amount_out: MinAmountOut::default(),
            recipient: DEFAULT_RECIPIENT.to_string(),
            deadline_minutes: DEFAULT_DEADLINE_MINUTES,
        },
        route_source: RouteSource::Live,
    }
}

async fn run() -> Result<(), String> {
    dotenv::dotenv().ok();
    init_tracing(false, "info");

    let config = SwapParamsConfig::from_env().map_err(|e| e.format())?;
    let client = KyberSwapClient::new(&config).map_err(|e| format!("{e:?}"))?;
    let mut session = SwapSession::new(client, default_form());

    println!("Swap parameters REPL ready ({})", config.api_url);
    print_help();

    let stdin = BufReader::new(io::stdin());
    let mut lines = stdin.lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (cmd, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        match cmd {
            "quit" | "exit" => {
                println!("Exiting…");
                break;
            }

            "help" => print_help(),

            "set" => {
                if let Err(e) = apply_setting(session.form_mut(), rest.trim()) {
                    eprintln!("{e}");
                } else {
                    println!("ok");
                }
            }

            "show" => {
                let form = session.form();
                println!("{form:#?}");
                match session.fee_preview() {
                    Some(Ok(preview)) => println!("fee: {preview}"),
                    Some(Err(e)) => eprintln!("fee: {}", e.current_context()),
                    None => println!("fee: none"),
                }
                println!("state: {}", session.state().name());
                if let Some(swap) = session.result() {
                    print_swap(swap, session.form().intent.token_out.decimals);
                }
            }

            "quote" => match session.update_min_amount_out().await {
                Ok(estimate) => {
                    let decimals_out = session.form().intent.token_out.decimals;
                    println!(
                        "quoted {} ({}) via {:?}, min out {} ({})",
                        estimate.quoted_output,
                        denormalize(estimate.quoted_output, decimals_out),
                        estimate.provider,
                        estimate.min_amount_out,
                        denormalize(estimate.min_amount_out, decimals_out),
                    );
                    if let Some(slippage) = estimate.implied_slippage {
                        println!("effective tolerance {slippage}%");
                    }
                }
                Err(e) => eprintln!("{}: {}", e.current_context(), e.format()),
            },

            "submit" => match session.submit().await {
                Ok(swap) => print_swap(&swap, session.form().intent.token_out.decimals),
                Err(failure) => eprintln!("{failure}"),
            },

            "clear" => {
                if session.clear() {
                    println!("cleared");
                } else {
                    println!("nothing to clear");
                }
            }

            "call" => {
                let mut parts = rest.split_whitespace();
                let from = match parts.next() {
                    Some(v) => v,
                    None => {
                        eprintln!("Usage: call <from> [router]");
                        continue;
                    }
                };
                let router = parts.next().unwrap_or(KYBERSWAP_ROUTER_ADDRESS);
                match session.contract_call(router, from) {
                    Some(Ok(call)) => match serde_json::to_string_pretty(&call) {
                        Ok(json) => println!("{json}"),
                        Err(e) => eprintln!("Failed to render call: {e}"),
                    },
                    Some(Err(e)) => eprintln!("{}", e.current_context()),
                    None => match session.state() {
                        SessionState::Failed(failure) => eprintln!("last submission failed: {failure}"),
                        state => eprintln!("no result to call ({})", state.name()),
                    },
                }
            }

            _ => {
                eprintln!("Unknown command: {cmd}");
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  set chain <id|name>");
    println!("  set token_in <address|native> <decimals>");
    println!("  set token_out <address|native> <decimals>");
    println!("  set amount <decimal>");
    println!("  set slippage <percent>");
    println!("  set min_out <base units|derived>");
    println!("  set recipient <address>");
    println!("  set deadline <minutes>");
    println!("  set fee <currency_in|currency_out> <amount> <bps|flat> <receiver>");
    println!("  set fee none");
    println!("  set route <live|default|json>");
    println!("  show | quote | submit | clear | call <from> [router] | quit");
}

fn apply_setting(form: &mut SwapForm, setting: &str) -> Result<(), String> {
    let (field, value) = setting.split_once(char::is_whitespace).unwrap_or((setting, ""));
    let value = value.trim();
    let mut parts = value.split_whitespace();

    match field {
        "chain" => {
            form.intent.chain_id = ChainId::try_from(value).map_err(|e| e.current_context().to_string())?;
        }
        "token_in" | "token_out" => {
            let (address, decimals) = match (parts.next(), parts.next()) {
                (Some(address), Some(decimals)) => (address, decimals),
                _ => return Err(format!("Usage: set {field} <address|native> <decimals>")),
            };
            let token = TokenSpec {
                address: if address == "native" {
                    NATIVE_TOKEN_EVM_ADDRESS.to_string()
                } else {
                    address.to_string()
                },
                decimals: decimals
                    .parse()
                    .map_err(|_| format!("Invalid decimals {decimals:?}"))?,
            };
            if field == "token_in" {
                form.intent.token_in = token;
            } else {
                form.intent.token_out = token;
            }
        }
        "amount" => form.intent.amount_in = value.to_string(),
        "slippage" => {
            form.options.slippage = parse_slippage(value).map_err(|e| e.current_context().to_string())?;
        }
        "min_out" => {
            form.options.min_amount_out = match value {
                "derived" => MinAmountOut::Derived,
                _ => MinAmountOut::Manual(value.to_string()),
            };
        }
        "recipient" => form.options.recipient = value.to_string(),
        "deadline" => {
            form.options.deadline_minutes = value
                .parse()
                .map_err(|_| format!("Invalid deadline minutes {value:?}"))?;
        }
        "fee" => {
            if value == "none" {
                form.fee_config = None;
                return Ok(());
            }
            let usage = "Usage: set fee <currency_in|currency_out> <amount> <bps|flat> <receiver>";
            let (charge_fee_by, fee_amount, kind, fee_receiver) =
                match (parts.next(), parts.next(), parts.next(), parts.next()) {
                    (Some(leg), Some(amount), Some(kind), Some(receiver)) => {
                        (leg, amount, kind, receiver)
                    }
                    _ => return Err(usage.to_string()),
                };
            form.fee_config = Some(FeeConfig {
                charge_fee_by: ChargeFeeBy::from_str(charge_fee_by)
                    .map_err(|_| format!("Invalid fee leg {charge_fee_by:?}"))?,
                fee_receiver: fee_receiver.to_string(),
                fee_amount: fee_amount.to_string(),
                is_in_bps: match kind {
                    "bps" => true,
                    "flat" => false,
                    _ => return Err(usage.to_string()),
                },
            });
        }
        "route" => {
            form.route_source = match value {
                "live" => RouteSource::Live,
                "default" => RouteSource::Custom(DEFAULT_CUSTOM_TRADE_ROUTE.to_string()),
                _ if value.is_empty() => return Err("Usage: set route <live|default|json>".to_string()),
                json => RouteSource::Custom(json.to_string()),
            };
        }
        _ => return Err(format!("Unknown field {field:?}")),
    }

    Ok(())
}

fn print_swap(swap: &AssembledSwap, decimals_out: u8) {
    let parameters = &swap.call_parameters;
    println!("method names: {}", parameters.joined_method_names());
    println!("value: {}", parameters.value);
    match serde_json::to_string_pretty(&parameters.args) {
        Ok(args) => println!("args: {args}"),
        Err(e) => eprintln!("Failed to render args: {e}"),
    }
    println!(
        "amount in: {} (after fee {})",
        swap.amount_in, swap.amount_in_after_fee
    );
    println!(
        "min amount out: {} ({})",
        swap.min_amount_out,
        denormalize(swap.min_amount_out, decimals_out)
    );
    println!("deadline: {}", swap.deadline);
    if let Some(fee) = &swap.charged_fee {
        println!("fee charged on {}: {} ({})", fee.leg, fee.amount, fee.display);
    }
    if let Some(simple) = swap.is_use_swap_simple_mode {
        println!("simple mode: {simple}");
    }
    if let Some(raw) = &swap.raw_executor_data {
        println!("raw executor data: {raw}");
    }
    if let Some(route) = &swap.trade_route {
        println!("trade route: {route}");
    }
}
