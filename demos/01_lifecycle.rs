/// lifecycle - collateral, disbursement, accrual and repayment
use collateral_loan_rs::{Amount, BasisPoints, InMemoryLedger, Ledger, LoanBuilder, PartyId, SafeTimeProvider, TimeSource};
use chrono::{Duration, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== loan lifecycle ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();
    let mut ledger = InMemoryLedger::new(&time);

    let lender = PartyId::new();
    let borrower = PartyId::new();
    ledger.deposit(lender, Amount::from_units(10_000))?;
    ledger.deposit(borrower, Amount::from_units(2_000))?;

    let mut loan = LoanBuilder::new()
        .lender(lender)
        .borrower(borrower)
        .loan_amount(Amount::from_units(10_000))
        .collateral_amount(Amount::from_units(5))
        .interest_rate(BasisPoints::from_bps(1_200))
        .duration_days(90)
        .loan_asset("USDC")
        .collateral_asset("WBTC")
        .build()?;

    println!("1. created: {}", loan.status());

    loan.provide_collateral(borrower, Amount::from_units(5), &mut ledger)?;
    println!("2. collateral in custody: {}", ledger.balance(&loan.custody()));

    loan.disburse(lender, Amount::from_units(10_000), &mut ledger)?;
    println!("3. disbursed on {}", time.now().format("%Y-%m-%d"));

    for month in 1..=3 {
        controller.advance(Duration::days(30));
        println!(
            "   month {}: amount due {}",
            month,
            loan.amount_due(&ledger)
        );
    }

    // always requery right before repaying
    let due = loan.amount_due(&ledger);
    let paid = loan.repay(borrower, due, &mut ledger)?;
    println!("4. repaid {} on {}", paid, time.now().format("%Y-%m-%d"));
    println!("   borrower balance: {}", ledger.balance(&borrower));
    println!("   lender balance: {}", ledger.balance(&lender));

    println!("\nevents:");
    for event in loan.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
