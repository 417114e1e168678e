/// liquidation - lender seizes collateral after the due date
use collateral_loan_rs::{Amount, BasisPoints, InMemoryLedger, Ledger, LoanBuilder, LoanError, PartyId, SafeTimeProvider, TimeSource};
use chrono::{Duration, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== liquidation ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();
    let mut ledger = InMemoryLedger::new(&time);

    let lender = PartyId::new();
    let borrower = PartyId::new();
    ledger.deposit(lender, Amount::from_raw(100))?;
    ledger.deposit(borrower, Amount::from_raw(1))?;

    let mut loan = LoanBuilder::new()
        .lender(lender)
        .borrower(borrower)
        .loan_amount(Amount::from_raw(100))
        .collateral_amount(Amount::from_raw(1))
        .interest_rate(BasisPoints::from_bps(500))
        .duration_days(30)
        .loan_asset("USDC")
        .collateral_asset("ETH")
        .build()?;

    loan.provide_collateral(borrower, Amount::from_raw(1), &mut ledger)?;
    loan.disburse(lender, Amount::from_raw(100), &mut ledger)?;

    // exactly at the due date the loan is not yet liquidatable
    controller.advance(Duration::days(30));
    match loan.liquidate(lender, &mut ledger) {
        Err(LoanError::NotYetDue { due_at, .. }) => println!("not yet due (due at {})", due_at),
        other => println!("unexpected: {:?}", other),
    }

    controller.advance(Duration::seconds(1));
    let seized = loan.liquidate(lender, &mut ledger)?;
    println!("liquidated {} raw units of collateral", seized.raw());
    println!("lender balance: {}", ledger.balance(&lender).raw());

    if let Err(e) = loan.repay(borrower, Amount::from_raw(105), &mut ledger) {
        println!("late repayment rejected: {}", e);
    }

    println!("\n{}", loan.json(time.now()));

    Ok(())
}
