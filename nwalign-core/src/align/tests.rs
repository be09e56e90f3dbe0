use super::{
    align_pairs, AlignOptions, Aligner, EditOp, EndSpaceFree, FormatType, MatrixType,
    PackedScoreMatrix, ScoreMatrix, ScoringPolicy, Strategy as AlignStrategy, Transcript,
    DEFAULT_LINE_WIDTH,
};
use crate::error::NwError;
use proptest::prelude::*;

const AMINO: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn dna(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![Just(b'A'), Just(b'C'), Just(b'G'), Just(b'T')],
        len,
    )
}

fn protein(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(AMINO), len)
}

fn scoring() -> impl Strategy<Value = ScoringPolicy> {
    (1i32..4, -4i32..=-1, -8i32..=0, -4i32..=0)
        .prop_map(|(m, x, o, e)| ScoringPolicy::new(m, x, o, e))
}

fn end_space() -> impl Strategy<Value = EndSpaceFree> {
    any::<[bool; 4]>().prop_map(|f| EndSpaceFree::new(f[0], f[1], f[2], f[3]))
}

fn aligner<'a>(
    a: &'a [u8],
    b: &'a [u8],
    matrix: MatrixType,
    strategy: AlignStrategy,
    policy: ScoringPolicy,
    esf: EndSpaceFree,
) -> Aligner<'a> {
    let mut al = Aligner::new(a, b, matrix, strategy).unwrap();
    al.set_policy(policy);
    al.set_end_space_free(esf);
    al
}

/// Every alignment of `a` against `b`, labelled by residue identity.
fn all_transcripts(a: &[u8], b: &[u8]) -> Vec<Transcript> {
    fn walk(
        a: &[u8],
        b: &[u8],
        i: usize,
        j: usize,
        cur: &mut Vec<EditOp>,
        out: &mut Vec<Transcript>,
    ) {
        if i == a.len() && j == b.len() {
            out.push(Transcript::new(cur.clone()));
            return;
        }
        if i < a.len() && j < b.len() {
            cur.push(if a[i] == b[j] {
                EditOp::Match
            } else {
                EditOp::Replace
            });
            walk(a, b, i + 1, j + 1, cur, out);
            cur.pop();
        }
        if j < b.len() {
            cur.push(EditOp::Insert);
            walk(a, b, i, j + 1, cur, out);
            cur.pop();
        }
        if i < a.len() {
            cur.push(EditOp::Delete);
            walk(a, b, i + 1, j, cur, out);
            cur.pop();
        }
    }
    let mut out = Vec::new();
    walk(a, b, 0, 0, &mut Vec::new(), &mut out);
    out
}

#[test]
fn known_answer_internal_deletion() {
    init_logger();
    for strategy in [AlignStrategy::Quadratic, AlignStrategy::LinearSpace] {
        let mut al = Aligner::new(b"AGCT", b"AGT", MatrixType::Nucleotide, strategy).unwrap();
        assert_eq!(al.run().unwrap(), -2);
        assert_eq!(al.transcript_string().unwrap(), "MMDM");
        let (r1, r2) = al.gapped_sequences().unwrap();
        assert_eq!(r1.as_bytes(), b"AGCT");
        assert_eq!(r2.as_bytes(), b"AG-T");
        assert_eq!(al.cigar().unwrap().to_string(), "2M1D1M");
    }
}

#[test]
fn known_answer_identical() {
    let mut al = Aligner::nw(b"ACGTACGT", b"ACGTACGT", MatrixType::Nucleotide).unwrap();
    assert_eq!(al.run().unwrap(), 8);
    assert_eq!(al.transcript_string().unwrap(), "MMMMMMMM");
    let text = al.format(FormatType::Text, DEFAULT_LINE_WIDTH).unwrap();
    assert_eq!(text, "ACGTACGT\n||||||||\nACGTACGT\n");
    assert!(!text.contains('-'));
}

#[test]
fn invalid_residue_rejected_at_construction() {
    let err = Aligner::nw(b"AGXZ", b"AGT", MatrixType::Nucleotide).unwrap_err();
    assert_eq!(
        err,
        NwError::InvalidSequence {
            seq: 1,
            ch: 'X',
            pos: 2
        }
    );
    let err = Aligner::mm(b"AGT", b"AGXZ", MatrixType::Nucleotide).unwrap_err();
    assert!(matches!(err, NwError::InvalidSequence { seq: 2, .. }));
}

#[test]
fn both_empty() {
    for strategy in [AlignStrategy::Quadratic, AlignStrategy::LinearSpace] {
        let mut al = Aligner::new(b"", b"", MatrixType::Nucleotide, strategy).unwrap();
        assert_eq!(al.run().unwrap(), 0);
        assert!(al.transcript().unwrap().is_empty());
    }
}

#[test]
fn one_side_empty_is_one_gap() {
    let mut al = Aligner::nw(b"ACGT", b"", MatrixType::Nucleotide).unwrap();
    assert_eq!(al.run().unwrap(), -5 + 3 * -2);
    assert_eq!(al.transcript_string().unwrap(), "DDDD");

    let mut al = Aligner::mm(b"", b"ACG", MatrixType::Nucleotide).unwrap();
    assert_eq!(al.run().unwrap(), -5 + 2 * -2);
    assert_eq!(al.transcript_string().unwrap(), "III");

    al.set_end_space_free(EndSpaceFree::new(true, false, false, false));
    assert_eq!(al.run().unwrap(), 0);
}

#[test]
fn outputs_require_a_run() {
    let mut al = Aligner::nw(b"ACGT", b"ACG", MatrixType::Nucleotide).unwrap();
    assert_eq!(al.score(), Err(NwError::NotRun));
    assert_eq!(al.transcript_string(), Err(NwError::NotRun));
    assert_eq!(al.format(FormatType::Text, 10), Err(NwError::NotRun));
    al.run().unwrap();
    assert!(al.score().is_ok());
    // any setter invalidates the result
    al.set_gap_open(-6);
    assert_eq!(al.cigar(), Err(NwError::NotRun));
}

#[test]
fn failed_run_leaves_no_result() {
    let mut al = Aligner::nw(b"ACGT", b"ACG", MatrixType::Nucleotide).unwrap();
    al.run().unwrap();
    al.set_policy(ScoringPolicy::new(1, -3, 5, -2));
    assert!(matches!(al.run(), Err(NwError::BadParameter { .. })));
    assert_eq!(al.transcript(), Err(NwError::NotRun));
}

#[test]
fn quadratic_refuses_oversized_matrix() {
    init_logger();
    let a = vec![b'A'; 200];
    let b = vec![b'C'; 100];
    let limit = AlignOptions::default().with_max_cells(10_000);

    let mut nw = Aligner::nw(&a, &b, MatrixType::Nucleotide).unwrap();
    nw.set_options(limit);
    assert_eq!(
        nw.run(),
        Err(NwError::ResourceLimit {
            cells: 20_000,
            limit: 10_000
        })
    );

    let mut mm = Aligner::mm(&a, &b, MatrixType::Nucleotide).unwrap();
    mm.set_options(limit);
    assert!(mm.run().is_ok());
}

#[test]
fn score_overflow_detected() {
    let mut al = Aligner::nw(b"AAA", b"AAA", MatrixType::Nucleotide).unwrap();
    al.set_match_score(i32::MAX / 2);
    assert!(matches!(al.run(), Err(NwError::ScoreOverflow { .. })));
}

#[test]
fn set_sequences_revalidates() {
    let mut al = Aligner::mm(b"ACGT", b"ACGT", MatrixType::Nucleotide).unwrap();
    assert_eq!(al.run().unwrap(), 4);
    al.set_sequences(b"AGCT", b"AGT").unwrap();
    assert_eq!(al.run().unwrap(), -2);
    let err = al.set_sequences(b"ACGT", b"AC-T").unwrap_err();
    assert!(matches!(err, NwError::InvalidSequence { seq: 2, pos: 2, .. }));
    assert_eq!(al.seq2(), b"AGT");
}

#[test]
fn mismatch_setter_rebuilds_table() {
    let mut al = Aligner::nw(b"AC", b"AG", MatrixType::Nucleotide).unwrap();
    assert_eq!(al.run().unwrap(), 1 - 3);
    al.set_mismatch_score(-1);
    assert_eq!(al.run().unwrap(), 0);
    assert_eq!(al.transcript_string().unwrap(), "MR");
}

#[test]
fn gap_opens_directly_after_opposite_gap() {
    // A replace at -30 loses to an Insert followed at once by a Delete.
    let policy = ScoringPolicy::new(1, -30, -1, -1);
    for strategy in [AlignStrategy::Quadratic, AlignStrategy::LinearSpace] {
        let mut al = aligner(
            b"AC",
            b"AG",
            MatrixType::Nucleotide,
            strategy,
            policy,
            EndSpaceFree::default(),
        );
        assert_eq!(al.run().unwrap(), -1);
        assert_eq!(al.transcript_string().unwrap(), "MID");
        let t = al.transcript().unwrap();
        assert_eq!(t.stats().gap_opens, 2);
        let rescored = t
            .score(b"AC", b"AG", al.matrix(), al.policy(), EndSpaceFree::default())
            .unwrap();
        assert_eq!(rescored, -1);
    }
}

#[test]
fn blosum62_protein_alignment() {
    let a = b"HEAGAWGHEE";
    let b = b"PAWHEAE";
    let mut nw = Aligner::nw(a, b, MatrixType::Blosum62).unwrap();
    let mut mm = Aligner::mm(a, b, MatrixType::Blosum62).unwrap();
    mm.set_options(AlignOptions::default().with_base_case_cells(1));
    let s = nw.run().unwrap();
    assert_eq!(mm.run().unwrap(), s);
    assert_eq!(nw.transcript(), mm.transcript());
    let t = nw.transcript().unwrap();
    let rescored = t
        .score(a, b, nw.matrix(), nw.policy(), EndSpaceFree::default())
        .unwrap();
    assert_eq!(rescored, s);
}

#[test]
fn packed_matrix_drives_scores() {
    // two-letter alphabet, X pairs with Y at +2
    let packed = PackedScoreMatrix::new(b"XY", vec![1, 2, 2, 1], -9).unwrap();
    let mut al = Aligner::nw(b"XX", b"YY", MatrixType::Packed(packed.clone())).unwrap();
    assert_eq!(al.run().unwrap(), 4);
    assert_eq!(al.transcript_string().unwrap(), "RR");
    let err = Aligner::nw(b"XA", b"YY", MatrixType::Packed(packed)).unwrap_err();
    assert!(matches!(err, NwError::InvalidSequence { ch: 'A', .. }));
}

#[test]
fn fasta_output() {
    let mut al = Aligner::nw(b"AGCT", b"AGT", MatrixType::Nucleotide).unwrap();
    al.run().unwrap();
    assert_eq!(
        al.format(FormatType::Fasta, DEFAULT_LINE_WIDTH).unwrap(),
        ">seq1\nAGCT\n>seq2\nAG-T\n"
    );
    assert!(matches!(
        al.format(FormatType::Text, 0),
        Err(NwError::BadParameter { .. })
    ));
}

#[test]
fn batch_alignment_reports_each_pair() {
    init_logger();
    let pairs: Vec<(&[u8], &[u8])> = vec![
        (&b"AGCT"[..], &b"AGT"[..]),
        (&b"ACGTACGT"[..], &b"ACGTACGT"[..]),
        (&b"AGXZ"[..], &b"A"[..]),
    ];
    let results = align_pairs(
        &pairs,
        MatrixType::Nucleotide,
        AlignStrategy::LinearSpace,
        &ScoringPolicy::default(),
    );
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().score, -2);
    assert_eq!(results[0].as_ref().unwrap().transcript.to_string(), "MMDM");
    assert_eq!(results[1].as_ref().unwrap().score, 8);
    assert!(matches!(results[2], Err(NwError::InvalidSequence { .. })));
}

#[test]
fn long_tied_runs_agree() {
    // Homopolymers produce many co-optimal paths at every split.
    let a = vec![b'A'; 300];
    let b = vec![b'A'; 170];
    let mut nw = Aligner::nw(&a, &b, MatrixType::Nucleotide).unwrap();
    let mut mm = Aligner::mm(&a, &b, MatrixType::Nucleotide).unwrap();
    mm.set_options(AlignOptions::default().with_base_case_cells(16));
    assert_eq!(nw.run(), mm.run());
    assert_eq!(nw.transcript(), mm.transcript());
}

proptest! {
    #[test]
    fn linear_space_matches_quadratic(
        a in dna(0..40),
        b in dna(0..40),
        policy in scoring(),
        esf in end_space(),
        base in 1usize..64,
        parallel in any::<bool>(),
    ) {
        let mut nw = aligner(&a, &b, MatrixType::Nucleotide, AlignStrategy::Quadratic, policy, esf);
        let mut mm = aligner(&a, &b, MatrixType::Nucleotide, AlignStrategy::LinearSpace, policy, esf);
        mm.set_options(
            AlignOptions::default()
                .with_base_case_cells(base)
                .with_parallel(parallel),
        );
        prop_assert_eq!(nw.run().unwrap(), mm.run().unwrap());
        prop_assert_eq!(nw.transcript_string().unwrap(), mm.transcript_string().unwrap());
    }
}

proptest! {
    #[test]
    fn linear_space_matches_quadratic_protein(
        a in protein(1..30),
        b in protein(1..30),
        esf in end_space(),
        base in 1usize..32,
    ) {
        let policy = ScoringPolicy::protein();
        let mut nw = aligner(&a, &b, MatrixType::Blosum62, AlignStrategy::Quadratic, policy, esf);
        let mut mm = aligner(&a, &b, MatrixType::Blosum62, AlignStrategy::LinearSpace, policy, esf);
        mm.set_options(AlignOptions::default().with_base_case_cells(base));
        prop_assert_eq!(nw.run().unwrap(), mm.run().unwrap());
        prop_assert_eq!(nw.transcript().unwrap(), mm.transcript().unwrap());
    }
}

proptest! {
    #[test]
    fn rescoring_matches_dp(
        a in dna(0..30),
        b in dna(0..30),
        policy in scoring(),
        esf in end_space(),
        strategy in prop_oneof![Just(AlignStrategy::Quadratic), Just(AlignStrategy::LinearSpace)],
    ) {
        let mut al = aligner(&a, &b, MatrixType::Nucleotide, strategy, policy, esf);
        let score = al.run().unwrap();
        let t = al.transcript().unwrap();
        let rescored = t.score(&a, &b, al.matrix(), al.policy(), esf).unwrap();
        prop_assert_eq!(rescored, score);
    }
}

proptest! {
    #[test]
    fn gapped_rows_round_trip(
        a in dna(0..30),
        b in dna(0..30),
        policy in scoring(),
    ) {
        let esf = EndSpaceFree::default();
        let mut al = aligner(&a, &b, MatrixType::Nucleotide, AlignStrategy::LinearSpace, policy, esf);
        al.run().unwrap();
        let (r1, r2) = al.gapped_sequences().unwrap();
        prop_assert_eq!(r1.len(), r2.len());
        prop_assert_eq!(r1.ungapped(), a.clone());
        prop_assert_eq!(r2.ungapped(), b.clone());
        let text: Transcript = al.transcript_string().unwrap().parse().unwrap();
        prop_assert_eq!(&text, al.transcript().unwrap());
    }
}

proptest! {
    #[test]
    fn score_is_symmetric(
        a in dna(0..30),
        b in dna(0..30),
        policy in scoring(),
        esf in end_space(),
    ) {
        let mut ab = aligner(&a, &b, MatrixType::Nucleotide, AlignStrategy::Quadratic, policy, esf);
        let swapped = esf.swapped();
        let mut ba = aligner(&b, &a, MatrixType::Nucleotide, AlignStrategy::Quadratic, policy, swapped);
        prop_assert_eq!(ab.run().unwrap(), ba.run().unwrap());
    }
}

proptest! {
    #[test]
    fn run_is_idempotent(
        a in dna(1..30),
        b in dna(1..30),
        strategy in prop_oneof![Just(AlignStrategy::Quadratic), Just(AlignStrategy::LinearSpace)],
    ) {
        let mut al = Aligner::new(&a, &b, MatrixType::Nucleotide, strategy).unwrap();
        let first = al.run().unwrap();
        let t1 = al.transcript().unwrap().clone();
        prop_assert_eq!(al.run().unwrap(), first);
        prop_assert_eq!(al.transcript().unwrap(), &t1);
    }
}

proptest! {
    #[test]
    fn dp_score_is_optimal(
        a in dna(0..6),
        b in dna(0..6),
        policy in scoring(),
        esf in end_space(),
    ) {
        let mut al = aligner(&a, &b, MatrixType::Nucleotide, AlignStrategy::Quadratic, policy, esf);
        let score = al.run().unwrap();
        let matrix = ScoreMatrix::nucleotide(policy.match_score, policy.mismatch_score);
        let best = all_transcripts(&a, &b)
            .iter()
            .map(|t| t.score(&a, &b, &matrix, &policy, esf).unwrap())
            .max()
            .unwrap();
        prop_assert_eq!(score, best);
    }
}
