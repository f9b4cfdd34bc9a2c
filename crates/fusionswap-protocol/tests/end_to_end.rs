//! End-to-end swap scenarios through the protocol surface.
//!
//! These tests drive both legs of a swap (fusion order on the source side,
//! Dutch auction on the destination side) through escrow release, and check
//! after every step that custody still balances against external deposits.

use fusionswap_custody::{ManualClock, MemoryEventSink};
use fusionswap_protocol::{AuctionParams, FusionOrderParams, SwapProtocol};
use fusionswap_types::{
    Address, FusionOrderId, Holder, OrderHash, PhaseDurations, ProtocolConfig, SwapError,
    SwapEvent, TimelockPhase, Whitelist, hash_secret, random_secret,
};

const USDC: &str = "USDC";
const NATIVE: &str = "NATIVE";
const T0: u64 = 1_700_000_000;

type TestProtocol = SwapProtocol<ManualClock, MemoryEventSink>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Protocol on a manual clock, plus the handles a test needs to drive it.
struct Harness {
    protocol: TestProtocol,
    clock: ManualClock,
    sink: MemoryEventSink,
    maker: Address,
    resolver: Address,
}

impl Harness {
    fn new() -> Self {
        init_tracing();
        let clock = ManualClock::new(T0);
        let sink = MemoryEventSink::new();
        let protocol = SwapProtocol::with_clock_and_sink(
            ProtocolConfig::default(),
            clock.clone(),
            sink.clone(),
        )
        .unwrap();
        let mut h = Self {
            protocol,
            clock,
            sink,
            maker: Address::from_label("maker"),
            resolver: Address::from_label("resolver"),
        };
        h.protocol.fund(h.maker, USDC, 10_000).unwrap();
        h.protocol.fund(h.maker, NATIVE, 1_000).unwrap();
        h.protocol.fund(h.resolver, USDC, 10_000).unwrap();
        h.protocol.fund(h.resolver, NATIVE, 1_000).unwrap();
        h
    }

    fn assert_conserved(&self) {
        self.protocol.verify_all_supply().unwrap();
        assert_eq!(self.protocol.verify_supply(USDC), Ok(()));
        assert_eq!(self.protocol.verify_supply(NATIVE), Ok(()));
    }

    fn order_params(&self, secrets: &[[u8; 32]], amount: u128, deposit: u128) -> FusionOrderParams {
        FusionOrderParams {
            order_hash: OrderHash([0xAB; 32]),
            asset_kind: USDC.into(),
            amount,
            safety_deposit: deposit,
            whitelist: Whitelist::specific([self.resolver]).unwrap(),
            segment_hashes: secrets.iter().map(|s| hash_secret(s)).collect(),
            durations: Some(PhaseDurations::new(3600, 1800, 900)),
            auto_cancel_after: Some(T0 + 86_400),
        }
    }

    fn auction_params(&self, secrets: &[[u8; 32]]) -> AuctionParams {
        AuctionParams {
            order_hash: OrderHash([0xCD; 32]),
            asset_kind: USDC.into(),
            starting_amount: 1000,
            ending_amount: 500,
            start_time: T0,
            end_time: T0 + 3600,
            decay_duration: 600,
            safety_deposit: 100,
            segment_hashes: secrets.iter().map(|s| hash_secret(s)).collect(),
        }
    }
}

fn secrets(n: usize) -> Vec<[u8; 32]> {
    (0..n).map(|_| random_secret()).collect()
}

#[test]
fn auction_price_halfway_through_decay() {
    let mut h = Harness::new();
    let id = h
        .protocol
        .create_auction(h.maker, h.auction_params(&secrets(1)))
        .unwrap();
    assert_eq!(h.protocol.current_price(id).unwrap(), 1000);
    h.clock.advance(300);
    assert_eq!(h.protocol.current_price(id).unwrap(), 750);
    h.clock.advance(10_000);
    assert_eq!(h.protocol.current_price(id).unwrap(), 500);
}

#[test]
fn segmented_order_fill_then_stale_index_rejected() {
    let mut h = Harness::new();
    let s = secrets(11);
    let order = h
        .protocol
        .create_fusion_order(h.maker, h.order_params(&s, 100, 20))
        .unwrap();

    let escrow = h
        .protocol
        .deploy_escrow_from_order(h.resolver, order, Some(2))
        .unwrap();
    let e = h.protocol.escrow(escrow).unwrap();
    assert_eq!(e.amount(), 30);
    assert_eq!(e.safety_deposit(), 6);
    assert!(e.hashlock().verify(&s[2]));
    assert_eq!(h.protocol.order(order).unwrap().last_filled(), Some(2));

    let err = h
        .protocol
        .deploy_escrow_from_order(h.resolver, order, Some(1))
        .unwrap_err();
    assert_eq!(
        err,
        SwapError::SegmentAlreadyFilled {
            requested: 1,
            last_filled: 2
        }
    );
    assert_eq!(h.protocol.escrow_count(), 1);
    h.assert_conserved();
}

#[test]
fn single_segment_order_full_accept_deletes_order() {
    let mut h = Harness::new();
    let order = h
        .protocol
        .create_fusion_order(h.maker, h.order_params(&secrets(1), 500, 50))
        .unwrap();

    let quote = h.protocol.resolver_accept_order(h.resolver, order, None).unwrap();
    assert_eq!(quote.amount, 500);
    assert_eq!(quote.safety_deposit, 50);
    assert!(quote.completes);
    assert!(h.protocol.order(order).is_none());
    assert_eq!(h.protocol.order_count(), 0);
    assert_eq!(h.protocol.balance(h.resolver, USDC), 10_500);
    assert_eq!(h.protocol.balance(h.maker, USDC), 9_500);
    h.assert_conserved();
}

#[test]
fn escrow_withdraw_waits_for_finality() {
    let mut h = Harness::new();
    let s = secrets(1);
    let order = h
        .protocol
        .create_fusion_order(h.maker, h.order_params(&s, 100, 10))
        .unwrap();
    let escrow = h
        .protocol
        .deploy_escrow_from_order(h.resolver, order, None)
        .unwrap();

    h.clock.advance(100);
    assert_eq!(
        h.protocol.escrow_phase(escrow).unwrap(),
        TimelockPhase::Finality
    );
    let err = h
        .protocol
        .escrow_withdraw(h.resolver, escrow, &s[0])
        .unwrap_err();
    assert_eq!(
        err,
        SwapError::WithdrawalNotOpen {
            phase: TimelockPhase::Finality
        }
    );

    h.clock.set(T0 + 3700);
    let payout = h
        .protocol
        .escrow_withdraw(h.resolver, escrow, &s[0])
        .unwrap();
    assert_eq!(payout.asset_recipient, h.resolver);
    assert_eq!(payout.amount, 100);
    assert!(h.protocol.escrow(escrow).is_none());
    assert_eq!(h.protocol.balance(h.resolver, USDC), 10_100);
    assert_eq!(h.protocol.balance(h.resolver, NATIVE), 1_010);

    let err = h
        .protocol
        .escrow_withdraw(h.resolver, escrow, &s[0])
        .unwrap_err();
    assert_eq!(err, SwapError::EscrowNotFound(escrow));
    h.assert_conserved();
}

#[test]
fn full_swap_both_legs() {
    let mut h = Harness::new();
    let s = secrets(1);

    // Source leg: maker sells 1000 USDC.
    let order = h
        .protocol
        .create_fusion_order(h.maker, h.order_params(&s, 1000, 40))
        .unwrap();
    let src = h
        .protocol
        .deploy_escrow_from_order(h.resolver, order, None)
        .unwrap();

    // Destination leg: resolver pays the maker at the auction price.
    let auction = h
        .protocol
        .create_auction(h.maker, h.auction_params(&s))
        .unwrap();
    h.clock.advance(300);
    let dst = h
        .protocol
        .deploy_escrow_from_auction(
            h.resolver,
            auction,
            None,
            PhaseDurations::new(1800, 1800, 900),
        )
        .unwrap();
    assert!(h.protocol.auction(auction).is_none());
    assert_eq!(h.protocol.escrow(dst).unwrap().amount(), 750);
    h.assert_conserved();

    // Secret revealed: both escrows release.
    h.clock.set(T0 + 3700);
    let dst_payout = h.protocol.escrow_withdraw(h.resolver, dst, &s[0]).unwrap();
    assert_eq!(dst_payout.asset_recipient, h.maker);
    let src_payout = h.protocol.escrow_withdraw(h.resolver, src, &s[0]).unwrap();
    assert_eq!(src_payout.asset_recipient, h.resolver);

    assert_eq!(h.protocol.balance(h.maker, USDC), 10_000 - 1000 + 750);
    assert_eq!(h.protocol.balance(h.resolver, USDC), 10_000 - 750 + 1000);
    assert_eq!(h.protocol.balance(h.maker, NATIVE), 1_000 - 40);
    assert_eq!(h.protocol.balance(h.resolver, NATIVE), 1_000 + 40);
    assert_eq!(h.protocol.escrow_count(), 0);
    h.assert_conserved();

    let names: Vec<&str> = h.sink.names();
    assert_eq!(
        names,
        vec![
            "order_created",
            "order_accepted",
            "escrow_created",
            "auction_created",
            "auction_filled",
            "escrow_created",
            "escrow_withdrawn",
            "escrow_withdrawn",
        ]
    );
}

#[test]
fn segmented_auction_completes_at_later_price() {
    let mut h = Harness::new();
    let s = secrets(3);
    let auction = h
        .protocol
        .create_auction(h.maker, h.auction_params(&s))
        .unwrap();
    let durations = PhaseDurations::new(600, 600, 600);

    // Half the order at the opening price of 1000.
    let first = h
        .protocol
        .deploy_escrow_from_auction(h.resolver, auction, Some(0), durations)
        .unwrap();
    let e = h.protocol.escrow(first).unwrap();
    assert_eq!(e.amount(), 500);
    assert_eq!(e.safety_deposit(), 50);
    assert!(e.hashlock().verify(&s[0]));
    assert_eq!(h.protocol.auction(auction).unwrap().last_filled(), Some(0));

    // The rest once the price has decayed to 600: owes 600 - 300.
    h.clock.advance(480);
    assert_eq!(h.protocol.current_price(auction).unwrap(), 600);
    let second = h
        .protocol
        .deploy_escrow_from_auction(h.resolver, auction, None, durations)
        .unwrap();
    let e = h.protocol.escrow(second).unwrap();
    assert_eq!(e.amount(), 300);
    assert_eq!(e.safety_deposit(), 50);
    assert!(e.hashlock().verify(&s[1]));
    assert!(!e.hashlock().verify(&s[2]));

    assert!(h.protocol.auction(auction).is_none());
    assert_eq!(h.protocol.auction_count(), 0);
    assert_eq!(h.protocol.escrow_count(), 2);
    assert_eq!(h.protocol.balance(h.resolver, USDC), 10_000 - 800);
    assert_eq!(h.protocol.balance(h.resolver, NATIVE), 1_000 - 100);
    h.assert_conserved();
}

#[test]
fn taker_recovers_destination_leg_during_private_cancellation() {
    let mut h = Harness::new();
    let s = secrets(1);
    let auction = h
        .protocol
        .create_auction(h.maker, h.auction_params(&s))
        .unwrap();
    let escrow = h
        .protocol
        .deploy_escrow_from_auction(h.resolver, auction, None, PhaseDurations::new(60, 60, 60))
        .unwrap();

    h.clock.advance(130);
    assert_eq!(
        h.protocol.escrow_phase(escrow).unwrap(),
        TimelockPhase::PrivateCancellation
    );
    let payout = h.protocol.escrow_recovery(h.resolver, escrow).unwrap();
    assert_eq!(payout.asset_recipient, h.resolver);
    assert_eq!(payout.deposit_recipient, h.resolver);
    assert_eq!(payout.amount, 1000);
    assert_eq!(h.protocol.balance(h.resolver, USDC), 10_000);
    assert_eq!(h.protocol.balance(h.resolver, NATIVE), 1_000);
    assert_eq!(h.protocol.balance(h.maker, USDC), 10_000);
    assert!(h.protocol.escrow(escrow).is_none());
    h.assert_conserved();
}

#[test]
fn recovery_returns_funds_to_committer() {
    let mut h = Harness::new();
    let s = secrets(3);
    let order = h
        .protocol
        .create_fusion_order(h.maker, h.order_params(&s, 100, 10))
        .unwrap();
    let escrow = h
        .protocol
        .deploy_escrow_from_order(h.resolver, order, Some(0))
        .unwrap();
    let stranger = Address::from_label("stranger");

    h.clock.set(T0 + 3600 + 1800);
    let err = h.protocol.escrow_recovery(stranger, escrow).unwrap_err();
    assert!(matches!(err, SwapError::NotTaker { .. }));

    h.clock.set(T0 + 3600 + 1800 + 900);
    let payout = h.protocol.escrow_recovery(stranger, escrow).unwrap();
    assert_eq!(payout.asset_recipient, h.maker);
    assert_eq!(payout.amount, 50);
    assert_eq!(payout.deposit_recipient, stranger);
    assert_eq!(h.protocol.balance(stranger, NATIVE), 5);
    assert!(matches!(
        h.protocol.escrow_recovery(stranger, escrow),
        Err(SwapError::EscrowNotFound(_))
    ));
    h.assert_conserved();
}

#[test]
fn partial_fills_sum_to_total() {
    let mut h = Harness::new();
    let s = secrets(5);
    let order = h
        .protocol
        .create_fusion_order(h.maker, h.order_params(&s, 1000, 100))
        .unwrap();

    let mut amounts = Vec::new();
    for segment in [Some(0), Some(2), None] {
        let quote = h
            .protocol
            .resolver_accept_order(h.resolver, order, segment)
            .unwrap();
        amounts.push((quote.amount, quote.safety_deposit));
    }
    assert_eq!(amounts, vec![(250, 25), (500, 50), (250, 25)]);
    assert!(h.protocol.order(order).is_none());
    h.assert_conserved();
}

#[test]
fn full_fill_index_after_partial_rejected() {
    let mut h = Harness::new();
    let s = secrets(4);
    let order = h
        .protocol
        .create_fusion_order(h.maker, h.order_params(&s, 90, 9))
        .unwrap();
    h.protocol
        .resolver_accept_order(h.resolver, order, Some(0))
        .unwrap();
    let err = h
        .protocol
        .resolver_accept_order(h.resolver, order, Some(3))
        .unwrap_err();
    assert!(matches!(err, SwapError::FullFillAfterPartial { .. }));
}

#[test]
fn cancellation_paths() {
    let mut h = Harness::new();
    let order = h
        .protocol
        .create_fusion_order(h.maker, h.order_params(&secrets(1), 300, 30))
        .unwrap();

    let err = h.protocol.cancel_fusion_order(h.resolver, order).unwrap_err();
    assert!(matches!(err, SwapError::AutoCancelNotReached { .. }));

    h.clock.set(T0 + 86_400);
    let outcome = h.protocol.cancel_fusion_order(h.resolver, order).unwrap();
    assert_eq!(outcome.refunded, 300);
    assert_eq!(outcome.deposit_recipient, h.resolver);
    assert_eq!(h.protocol.balance(h.maker, USDC), 10_000);
    assert_eq!(h.protocol.balance(h.resolver, NATIVE), 1_030);

    let auction = h
        .protocol
        .create_auction(h.maker, h.auction_params(&secrets(1)))
        .unwrap();
    assert!(matches!(
        h.protocol.cancel_auction(h.resolver, auction),
        Err(SwapError::NotMaker { .. })
    ));
    h.protocol.cancel_auction(h.maker, auction).unwrap();
    assert_eq!(
        h.protocol.cancel_auction(h.maker, auction),
        Err(SwapError::AuctionNotFound(auction))
    );
    h.assert_conserved();
}

#[test]
fn rejected_operations_leave_no_trace() {
    let mut h = Harness::new();
    let s = secrets(1);
    let order = h
        .protocol
        .create_fusion_order(h.maker, h.order_params(&s, 100, 10))
        .unwrap();
    h.sink.clear();

    let stranger = Address::from_label("stranger");
    assert!(matches!(
        h.protocol.deploy_escrow_from_order(stranger, order, None),
        Err(SwapError::NotWhitelisted { .. })
    ));
    assert!(matches!(
        h.protocol.resolver_accept_order(h.resolver, FusionOrderId::new(), None),
        Err(SwapError::OrderNotFound(_))
    ));
    assert!(h.sink.events().is_empty());
    assert_eq!(h.protocol.balance(Holder::Order(order), USDC), 100);
    assert_eq!(h.protocol.escrow_count(), 0);
}

#[test]
fn unfunded_auction_fill_is_atomic() {
    let mut h = Harness::new();
    let auction = h
        .protocol
        .create_auction(h.maker, h.auction_params(&secrets(1)))
        .unwrap();
    let broke = Address::from_label("broke");
    h.protocol.fund(broke, USDC, 2_000).unwrap();

    let err = h
        .protocol
        .deploy_escrow_from_auction(broke, auction, None, PhaseDurations::default())
        .unwrap_err();
    assert!(matches!(err, SwapError::InsufficientBalance { .. }));
    assert_eq!(h.protocol.balance(broke, USDC), 2_000);
    assert_eq!(h.protocol.auction(auction).unwrap().last_filled(), None);
    h.assert_conserved();
}

#[test]
fn events_serialize_as_tagged_json() {
    let mut h = Harness::new();
    h.protocol
        .create_auction(h.maker, h.auction_params(&secrets(1)))
        .unwrap();
    let events = h.sink.events();
    let [SwapEvent::AuctionCreated { maker, .. }] = events.as_slice() else {
        panic!("expected one auction_created event, got {events:?}");
    };
    assert_eq!(*maker, h.maker);
    let json = serde_json::to_value(&events[0]).unwrap();
    assert_eq!(json["type"], "auction_created");
}
