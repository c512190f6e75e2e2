use anyhow::{Context, Result, anyhow};
use bank_engine::{Account, Bank};
use clap::Parser;
use rust_decimal::Decimal;
use tracing::{Level, info};

#[derive(Parser, Debug)]
#[command(about = "Builds a bank from the given accounts, runs transfers and prints the roster.")]
struct Args {
    /// Bank name
    #[arg(short = 'b', long = "bank", default_value = "Banco del Estado")]
    bank: String,

    /// Account to register, as OWNER=BALANCE
    #[arg(short = 'a', long = "account", value_parser = parse_account)]
    accounts: Vec<(String, Decimal)>,

    /// Transfer between registered owners, as FROM:TO:AMOUNT
    #[arg(short = 't', long = "transfer", value_parser = parse_transfer)]
    transfers: Vec<TransferArg>,

    /// Log balance computations
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

#[derive(Clone, Debug)]
struct TransferArg {
    from: String,
    to: String,
    amount: Decimal,
}

fn parse_account(raw: &str) -> Result<(String, Decimal), String> {
    let (owner, balance) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected OWNER=BALANCE, got `{raw}`"))?;
    let balance = balance
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid balance `{balance}`: {e}"))?;
    Ok((owner.trim().to_string(), balance))
}

fn parse_transfer(raw: &str) -> Result<TransferArg, String> {
    let mut parts = raw.splitn(3, ':');
    let (Some(from), Some(to), Some(amount)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected FROM:TO:AMOUNT, got `{raw}`"));
    };
    let amount = amount
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid amount `{amount}`: {e}"))?;
    Ok(TransferArg {
        from: from.trim().to_string(),
        to: to.trim().to_string(),
        amount,
    })
}

fn run(args: Args) -> Result<Bank> {
    let mut bank = Bank::new(args.bank);
    for (owner, balance) in args.accounts {
        bank.add_account(Account::new(owner, balance).into_shared());
    }

    for transfer in args.transfers {
        let find = |owner: &str| {
            bank.accounts()
                .iter()
                .find(|account| account.borrow().owner() == owner)
                .cloned()
                .ok_or_else(|| anyhow!("no account owned by `{owner}`"))
        };
        let from = find(&transfer.from)?;
        let to = find(&transfer.to)?;
        if std::rc::Rc::ptr_eq(&from, &to) {
            return Err(anyhow!("cannot transfer from `{}` to itself", transfer.from));
        }

        bank.transfer(&mut from.borrow_mut(), &mut to.borrow_mut(), transfer.amount)
            .with_context(|| {
                format!(
                    "transfer of {} from `{}` to `{}` failed",
                    transfer.amount, transfer.from, transfer.to
                )
            })?;
        info!(from = %transfer.from, to = %transfer.to, amount = %transfer.amount, "transfer done");
    }

    Ok(bank)
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let bank = run(args)?;

    println!("{bank}");
    for account in bank.accounts() {
        println!("{}", account.borrow());
    }

    Ok(())
}
