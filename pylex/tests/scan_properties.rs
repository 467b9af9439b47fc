use pylex::lexical::{Scanner, SourceModel};
use pylex::symbols::SymbolKind;
use pylex::tokens::TokenStream;
use pylex::{scan_source, ScanConfig, TokenKind};

const EXAMPLE: &str = include_str!("fixtures/example.py");
const INPUT: &str = include_str!("fixtures/input.py");

fn default_scan(source: &str) -> pylex::ScanReport {
    scan_source(source, &ScanConfig::default())
}

#[test]
fn sample_programs_scan_clean() {
    for (name, source) in [("example.py", EXAMPLE), ("input.py", INPUT)] {
        let report = default_scan(source);
        assert!(report.is_clean(), "{name}: {:#?}", report.diagnostics);

        let stream = report.token_stream();
        assert!(stream.is_balanced(), "{name}");
        assert!(stream.has_end_of_input(), "{name}");
        assert_eq!(
            report.tokens.iter().filter(|t| t.kind == TokenKind::EndOfInput).count(),
            1
        );
    }
}

#[test]
fn sample_symbols_are_scoped_by_definition() {
    let report = default_scan(EXAMPLE);
    let symbols = &report.symbols;

    let car = symbols.find("Car").expect("class recorded");
    assert_eq!((car.kind, car.scope.as_str()), (SymbolKind::Class, "global"));

    let init = symbols.find("__init__").expect("method recorded");
    assert_eq!((init.kind, init.scope.as_str()), (SymbolKind::Function, "Car"));

    let selves: Vec<_> = symbols.all_named("self").map(|r| r.scope.as_str()).collect();
    assert_eq!(selves, vec!["__init__", "display"]);

    let result = symbols.find("result").expect("local recorded");
    assert_eq!((result.scope.as_str(), result.scope_depth), ("add", 2));

    // `z -= 1` and `z += 1` update the global entry
    assert_eq!(symbols.all_named("z").count(), 1);

    let ids: Vec<_> = symbols.entries.iter().map(|r| r.id).collect();
    assert_eq!(ids, (0..symbols.len()).collect::<Vec<_>>());
}

#[test]
fn indents_and_dedents_balance_on_arbitrary_nesting() {
    let source = "\
class Shape:
    def area(self, scale):
        if scale:
            for step in range(scale):
                while step:
                    step -= 1
        return 0
print(Shape)
";
    let report = default_scan(source);
    assert!(report.is_clean(), "{:#?}", report.diagnostics);
    let stream = report.token_stream();
    assert_eq!(stream.count_of(TokenKind::Indent), 5);
    assert_eq!(stream.count_of(TokenKind::Dedent), 5);
    assert_eq!(stream.max_depth(), 5);
    assert_eq!(report.metrics.max_depth, 6);
}

#[test]
fn scanning_twice_is_identical() {
    for source in [EXAMPLE, include_str!("fixtures/broken_snippets.py")] {
        let first = default_scan(source);
        let second = default_scan(source);
        assert_eq!(first.tokens, second.tokens);
        assert_eq!(first.diagnostics, second.diagnostics);
        assert_eq!(first.symbols, second.symbols);
    }
}

#[test]
fn lexemes_rebuild_the_source() {
    let source = "\
def total(values):
    acc = 0
    for v in values:
        acc += v  # running sum
    return acc

print(total([1, 2, 3]), \"done\")
";
    let report = default_scan(source);
    assert!(report.is_clean(), "{:#?}", report.diagnostics);
    assert_eq!(report.token_stream().reconstruct_source(), source);
}

#[test]
fn tokens_are_ordered_by_position() {
    let report = default_scan(EXAMPLE);
    let positions: Vec<_> = report
        .tokens
        .iter()
        .filter(|t| !t.kind.is_structural())
        .map(|t| (t.line, t.column))
        .collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);
}

#[test]
fn offsets_point_at_lexemes() {
    let report = default_scan(INPUT);
    for token in report.tokens.iter().filter(|t| !t.kind.is_structural()) {
        assert_eq!(
            INPUT.get(token.offset..token.offset + token.lexeme.len()),
            Some(token.lexeme.as_str()),
            "{token}"
        );
    }
}

#[test]
fn tab_width_controls_indentation_only() {
    let source = "if True:\n\tx = 1\n        y = 2\n";

    let report = scan_source(source, &ScanConfig { tab_width: 8, ..ScanConfig::default() });
    assert!(report.is_clean(), "{:#?}", report.diagnostics);
    let x = report.tokens.iter().find(|t| t.lexeme == "x").expect("x token");
    assert_eq!(x.column, 2);

    let report = scan_source(source, &ScanConfig { tab_width: 4, ..ScanConfig::default() });
    assert_eq!(report.diagnostics.len(), 1);
}

#[test]
fn streaming_matches_report() {
    let streamed: Vec<_> = Scanner::new(EXAMPLE, &ScanConfig::default()).collect();
    let report = default_scan(EXAMPLE);
    assert_eq!(streamed, report.tokens);
    assert_eq!(TokenStream::new(streamed).len(), report.metrics.token_count);
}

#[test]
fn metrics_describe_the_source() {
    let report = default_scan(INPUT);
    let model = SourceModel::new(INPUT, 4);
    assert_eq!(report.metrics.lines, model.line_count());
    assert_eq!(report.metrics.comment_lines, 2);
    assert_eq!(report.metrics.token_count, report.tokens.len());
    assert_eq!(report.metrics.diagnostics, 0);
}

#[test]
fn empty_source_yields_only_end_of_input() {
    let report = default_scan("");
    assert_eq!(report.tokens.len(), 1);
    let eoi = &report.tokens[0];
    assert_eq!((eoi.kind, eoi.line, eoi.column, eoi.offset), (TokenKind::EndOfInput, 1, 1, 0));
}
