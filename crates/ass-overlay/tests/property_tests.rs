//! Property-based tests for easing, envelopes and line splitting

use ass_overlay::animation::{sweep_offset, Easing, Fade};
use ass_overlay::layout::{split, strip_tags};
use proptest::prelude::*;

const BLOCKS: [&str; 7] = ["", "\\b1", "\\i1", "\\fs30", "\\c&HFF&", "\\frz10", "\\bord2"];

fn block() -> impl Strategy<Value = &'static str> {
    prop::sample::select(BLOCKS.to_vec())
}

fn body() -> impl Strategy<Value = String> {
    "[a-z ]{0,6}"
}

fn line() -> impl Strategy<Value = Vec<(&'static str, String)>> {
    prop::collection::vec((block(), body()), 1..6)
}

fn render_line(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(block, body)| format!("{{{block}}}{body}"))
        .collect()
}

proptest! {
    #[test]
    fn accelerating_easing_lags_linear(accel in 1.5f64..4.0, x in 0.01f64..0.99) {
        let easing = Easing::from_accel(accel);
        prop_assert!(easing.eval(x) < x);
    }

    #[test]
    fn easing_is_monotonic(accel in 0.3f64..4.0, a in 0.0f64..1.0, b in 0.0f64..1.0) {
        let easing = Easing::from_accel(accel);
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(easing.eval(low) <= easing.eval(high) + 1e-5);
    }

    #[test]
    fn sweep_offset_moves_forward_within_bounds(
        start_frac in 0.0f64..=1.0,
        width in 0.0f64..=1.0,
        times in prop::collection::vec(-500.0f64..1500.0, 2..8),
    ) {
        let frac = width * (1.0 - start_frac);
        let mut times = times;
        times.sort_by(f64::total_cmp);
        let offsets: Vec<f64> = times
            .iter()
            .map(|&t| sweep_offset(t, 0.0, 1000.0, start_frac, frac))
            .collect();
        for offset in &offsets {
            prop_assert!((0.0..=1.0).contains(offset));
        }
        for pair in offsets.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn fade_keys_are_exact(
        alphas in prop::array::uniform3(any::<u8>()),
        start in 0.0f64..1000.0,
        gaps in prop::array::uniform3(1.0f64..1000.0),
    ) {
        let t1 = start;
        let t2 = t1 + gaps[0];
        let t3 = t2 + gaps[1];
        let t4 = t3 + gaps[2];
        let fade = Fade::from_alphas(alphas, [t1, t2, t3, t4]);
        prop_assert_eq!(fade.opacity_at(t1), fade.o1);
        prop_assert_eq!(fade.opacity_at(t2), fade.o2);
        prop_assert_eq!(fade.opacity_at(t3), fade.o2);
        prop_assert_eq!(fade.opacity_at(t4), fade.o3);
        prop_assert_eq!(fade.opacity_at(t4 + 1.0), fade.o3);
    }

    #[test]
    fn split_pieces_keep_the_visible_text(pairs in line()) {
        let text = render_line(&pairs);
        if let Some(split) = split(&text) {
            let joined: String = split.pieces.iter().map(|piece| strip_tags(piece)).collect();
            prop_assert_eq!(joined, strip_tags(&text));
            prop_assert_eq!(split.breaks.iter().sum::<usize>(), split.pieces.len());
            prop_assert!(split.pieces.iter().all(|piece| piece.starts_with('{')), "every piece starts with a tag block");
        }
    }

    #[test]
    fn rotation_after_the_first_block_always_splits(
        head in line(),
        tail in body(),
    ) {
        let text = format!("{}{{\\frz45}}{tail}", render_line(&head));
        let split = split(&text).expect("rotation splits");
        prop_assert!(split.pieces.len() >= 2);
        prop_assert_eq!(split.breaks.len(), 1);
    }
}
