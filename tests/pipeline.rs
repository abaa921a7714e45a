//! End-to-end scenarios through the public library API.

use std::fs;
use std::path::Path;

use grammar_eval::application::evaluate_use_case::{score_results, EvaluateConfig, EvaluateUseCase};
use grammar_eval::data::reader::read_predictions;
use grammar_eval::data::writer::write_predictions;
use grammar_eval::domain::error::EvalError;
use grammar_eval::domain::example::{Label, PredictionRecord};
use grammar_eval::domain::traits::Recognizer;
use grammar_eval::infra::metrics::ZeroDivisionPolicy;
use grammar_eval::parsing::{classify, load_grammar, Strategy};

const TOY: &str = "S -> NP VP\nNP -> DT NN\nVP -> VBZ\n";

fn tokens(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

fn recognizers() -> Vec<Box<dyn Recognizer>> {
    [Strategy::Earley, Strategy::Cyk]
        .into_iter()
        .map(|s| s.build(load_grammar(TOY).unwrap(), None))
        .collect()
}

fn setup(dir: &Path, grammar: &str, data: &str) -> EvaluateConfig {
    let grammar_path = dir.join("grammars/toy.cfg");
    let input_path = dir.join("data/train.tsv");
    fs::create_dir_all(grammar_path.parent().unwrap()).unwrap();
    fs::create_dir_all(input_path.parent().unwrap()).unwrap();
    fs::write(&grammar_path, grammar).unwrap();
    fs::write(&input_path, data).unwrap();

    EvaluateConfig {
        input: input_path,
        grammar: grammar_path,
        output: dir.join("output/train_results.tsv"),
        ..EvaluateConfig::default()
    }
}

#[test]
fn grammatical_sequence_is_predicted_correct() {
    for r in recognizers() {
        assert_eq!(classify(r.as_ref(), &tokens("DT NN VBZ")), Label::NoError, "{}", r.name());
    }
}

#[test]
fn misordered_sequence_is_predicted_error() {
    for r in recognizers() {
        assert_eq!(classify(r.as_ref(), &tokens("NN VBZ DT")), Label::Error, "{}", r.name());
    }
}

#[test]
fn unknown_tag_is_predicted_error_without_crashing() {
    for r in recognizers() {
        assert_eq!(r.recognize(&tokens("DT NN JJR")), Ok(false));
        assert_eq!(classify(r.as_ref(), &tokens("DT NN JJR")), Label::Error);
    }
}

#[test]
fn one_of_each_outcome_gives_half_precision_and_recall() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.tsv");
    let records = vec![
        PredictionRecord::new("1", Label::Error, Label::Error),
        PredictionRecord::new("2", Label::NoError, Label::Error),
        PredictionRecord::new("3", Label::Error, Label::NoError),
        PredictionRecord::new("4", Label::NoError, Label::NoError),
    ];
    write_predictions(&path, &records).unwrap();

    let m = score_results(&path, ZeroDivisionPolicy::Zero).unwrap();
    assert_eq!((m.confusion.tp, m.confusion.fp, m.confusion.fn_, m.confusion.tn), (1, 1, 1, 1));
    assert_eq!(m.precision, 0.5);
    assert_eq!(m.recall, 0.5);
}

#[test]
fn all_negative_dataset_uses_zero_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = setup(
        dir.path(),
        TOY,
        "id\tlabel\tpos\n1\t0\tDT NN VBZ\n2\t0\tDT NN VBZ\n3\t0\tDT NN VBZ\n",
    );

    let m = EvaluateUseCase::new(cfg).execute().unwrap();
    assert_eq!(m.confusion.tn, 3);
    assert_eq!(m.confusion.tp + m.confusion.fp, 0);
    assert_eq!(m.precision, 0.0);
    assert_eq!(m.recall, 0.0);
}

#[test]
fn full_pipeline_counts_every_row_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let data = "\
id\tlabel\tpos
a\t0\tDT NN VBZ
b\t1\tNN VBZ DT
c\t1\tDT NN JJR
d\t0\tDT NN VBZ
e\t1\t
";
    for strategy in [Strategy::Earley, Strategy::Cyk] {
        let mut cfg = setup(dir.path(), TOY, data);
        cfg.strategy = strategy;

        let m = EvaluateUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(m.confusion.total(), 5);
        assert_eq!(m.precision, 1.0);
        assert_eq!(m.recall, 1.0);

        let records = read_predictions(&cfg.output).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d", "e"]);
    }
}

#[test]
fn malformed_grammar_is_reported_with_its_kind() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = setup(dir.path(), "S NP VP\n", "id\tlabel\tpos\n1\t0\tDT\n");

    let err = EvaluateUseCase::new(cfg).execute().unwrap_err();
    let kind = err.downcast_ref::<EvalError>().unwrap();
    assert!(matches!(kind, EvalError::GrammarFormat { line: 1, .. }));
    assert_eq!(kind.exit_code(), 3);
}

#[test]
fn missing_dataset_is_reported_with_its_kind() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = setup(dir.path(), TOY, "");
    cfg.input = dir.path().join("nope.tsv");

    let err = EvaluateUseCase::new(cfg).execute().unwrap_err();
    assert_eq!(err.downcast_ref::<EvalError>().map(EvalError::exit_code), Some(4));
}

#[test]
fn missing_results_file_is_reported_with_its_kind() {
    let dir = tempfile::tempdir().unwrap();
    let err = score_results(&dir.path().join("absent.tsv"), ZeroDivisionPolicy::Zero).unwrap_err();
    assert!(matches!(err, EvalError::ResultsNotFound { .. }));
}

#[test]
fn shipped_toy_grammar_agrees_with_shipped_labels() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let dir = tempfile::tempdir().unwrap();
    let cfg = EvaluateConfig {
        input: root.join("data/train.tsv"),
        grammar: root.join("grammars/toy.cfg"),
        output: dir.path().join("train_results.tsv"),
        ..EvaluateConfig::default()
    };

    let m = EvaluateUseCase::new(cfg).execute().unwrap();
    assert_eq!(m.confusion.total(), 8);
    assert_eq!(m.precision, 1.0);
    assert_eq!(m.recall, 1.0);
}
