/// quick start - minimal example to get started
use collateral_loan_rs::{Amount, BasisPoints, InMemoryLedger, LoanBuilder, PartyId, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let mut ledger = InMemoryLedger::new(&time);

    let lender = PartyId::new();
    let borrower = PartyId::new();
    ledger.deposit(lender, Amount::from_units(1_000))?;
    ledger.deposit(borrower, Amount::from_units(2))?;

    // 1,000 USDC for 30 days at 5%, secured by 1 ETH
    let mut loan = LoanBuilder::new()
        .lender(lender)
        .borrower(borrower)
        .loan_amount(Amount::from_units(1_000))
        .collateral_amount(Amount::from_units(1))
        .interest_rate(BasisPoints::from_bps(500))
        .duration_days(30)
        .loan_asset("USDC")
        .collateral_asset("ETH")
        .build()?;

    loan.provide_collateral(borrower, Amount::from_units(1), &mut ledger)?;
    loan.disburse(lender, Amount::from_units(1_000), &mut ledger)?;

    // print current state
    println!("{}", loan.json(time.now()));

    Ok(())
}
