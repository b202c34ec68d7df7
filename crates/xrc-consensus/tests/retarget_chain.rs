use xrc_consensus::{
    next_block_bits, required_target, HeaderChain, NetworkKind, NetworkParams, Target, NEVER,
};
use xrc_core::BlockHeader;

const T0: u32 = 1_523_716_000;

/// Original regime only, with a short interval.
fn short_interval(target_timespan: u32) -> NetworkParams {
    let limit = Target::from_compact(0x1e00_ffff).unwrap();
    NetworkParams {
        kind: NetworkKind::Testnet,
        pow_limit: limit.clone(),
        pow_limit2: limit,
        target_timespan,
        target_spacing: 600,
        allow_min_difficulty_blocks: false,
        no_retargeting: false,
        pow_limit2_height: NEVER - 1,
        pow_limit2_time: 0,
        digishield_x11_height: NEVER,
        digishield_x11_v2_height: NEVER,
        digishield_x11_time: 0,
    }
}

/// Extend `chain` by `count` headers carrying exactly the bits the engine requires.
fn grow(params: &NetworkParams, chain: &mut HeaderChain, count: u32, gap: u32) {
    for _ in 0..count {
        let (time, bits) = match chain.tip() {
            None => {
                let genesis = required_target::<HeaderChain>(params, None, T0).unwrap();
                (T0, genesis.to_compact())
            }
            Some(tip) => {
                let time = tip.time() + gap;
                (time, next_block_bits(params, tip, time).unwrap())
            }
        };
        chain.push(BlockHeader {
            time,
            bits,
            ..BlockHeader::default()
        });
    }
}

fn scaled(bits: u32, num: u64, den: u64) -> u32 {
    Target::from_compact(bits)
        .unwrap()
        .multiply(num)
        .divide(den)
        .normalized()
        .to_compact()
}

fn bits_at(chain: &HeaderChain, height: u32) -> u32 {
    chain.at(height).unwrap().bits()
}

#[test]
fn second_boundary_matches_first_when_window_spans_target_timespan() {
    // Interval 9; eight gaps of 675s measure exactly 5400s.
    let params = short_interval(5_400);
    assert_eq!(params.difficulty_adjustment_interval(), 9);

    let mut chain = HeaderChain::default();
    grow(&params, &mut chain, 2 * 9, 675);
    let second = next_block_bits(&params, chain.tip().unwrap(), T0 + 18 * 675).unwrap();

    assert_eq!(bits_at(&chain, 9), bits_at(&chain, 0));
    assert_eq!(second, bits_at(&chain, 9));
}

#[test]
fn exact_spacing_measures_interval_minus_one_gaps() {
    // Interval 10 at exactly 600s: each boundary sees 9 * 600 of 6000.
    let params = short_interval(6_000);
    let mut chain = HeaderChain::default();
    grow(&params, &mut chain, 2 * 10, 600);
    let second = next_block_bits(&params, chain.tip().unwrap(), T0 + 20 * 600).unwrap();

    let genesis = bits_at(&chain, 0);
    let first = bits_at(&chain, 10);
    assert_eq!(first, scaled(genesis, 5_400, 6_000));
    assert_eq!(second, scaled(first, 5_400, 6_000));

    for height in (1..10).chain(11..20) {
        assert_eq!(bits_at(&chain, height), bits_at(&chain, height - 1), "height {height}");
    }
}

#[test]
fn mainnet_genesis_and_hard_fork_step() {
    let params = NetworkParams::mainnet();
    let genesis = required_target::<HeaderChain>(&params, None, T0).unwrap();
    assert_eq!(genesis.to_compact(), 0x1d00_ffff);

    let mut chain = HeaderChain::default();
    grow(&params, &mut chain, params.pow_limit2_height + 1, 600);
    assert_eq!(chain.tip_height(), Some(params.pow_limit2_height));
    assert!(chain.headers().iter().all(|h| h.bits == 0x1d00_ffff));

    let tip = chain.tip().unwrap();
    let step = next_block_bits(&params, tip, tip.time() + 600).unwrap();
    assert_eq!(step, 0x1b09_2489);

    grow(&params, &mut chain, 1, 600);
    let tip = chain.tip().unwrap();
    assert_eq!(next_block_bits(&params, tip, tip.time() + 600).unwrap(), step);
}

#[test]
fn mainnet_boundary_never_exceeds_post_fork_floor() {
    let params = NetworkParams::mainnet();
    let interval = params.difficulty_adjustment_interval();
    assert_eq!(interval, 2016);

    let mut chain = HeaderChain::default();
    grow(&params, &mut chain, interval, 2_400);
    let tip = chain.tip().unwrap();
    assert_eq!(bits_at(&chain, interval - 1), 0x1b09_2489);

    let bits = next_block_bits(&params, tip, tip.time() + 2_400).unwrap();
    assert_eq!(bits, params.pow_limit.to_compact());
}

#[test]
fn mainnet_digishield_bootstrap_then_retarget() {
    let params = NetworkParams::mainnet();
    let activation = params.digishield_x11_height;
    let anchor = 0x1b01_a61a;

    let base = activation - 100;
    let segment = |len: u32| {
        HeaderChain::with_base(
            base,
            (0..len)
                .map(|i| BlockHeader {
                    time: T0 + i * 600,
                    bits: anchor,
                    ..BlockHeader::default()
                })
                .collect(),
        )
    };

    // Candidate heights activation+1 ..= activation+61 use the anchor.
    for candidate in [activation + 1, activation + 61] {
        let chain = segment(candidate - base);
        let tip = chain.tip().unwrap();
        assert_eq!(tip.height() + 1, candidate);
        assert_eq!(next_block_bits(&params, tip, tip.time() + 600).unwrap(), anchor);
    }

    let chain = segment(activation + 62 - base);
    let tip = chain.tip().unwrap();
    assert_eq!(
        next_block_bits(&params, tip, tip.time() + 600).unwrap(),
        scaled(anchor, 29_850, 30_000)
    );
}
