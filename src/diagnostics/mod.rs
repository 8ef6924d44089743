pub mod codes;

use ariadne::{Color, Label as AriadneLabel, Report, ReportKind, Source};
use std::mem;
use std::ops::Range;

use crate::reporter::{CompilerError, LexerError, ParserError};
use crate::utils::Span;
use codes::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn new(span: impl Into<Span>, message: impl Into<String>) -> Self {
        Self {
            span: span.into(),
            message: message.into(),
        }
    }
}

// --- Diagnostic 结构体 ---

/// 一条可渲染的诊断。核心字段（code / level / 默认消息）来自 `ErrorCode`，
/// message 可以被覆盖以携带动态信息（例如具体的类型名）。
#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: &'static str,
    level: DiagnosticLevel,
    message: String,
    labels: Vec<Label>,
    notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(error_code: &'static ErrorCode, primary_label: Label) -> Self {
        Self {
            code: error_code.code,
            level: error_code.level,
            message: error_code.message.to_string(),
            labels: vec![primary_label],
            notes: Vec::new(),
        }
    }

    pub fn error(error_code: &'static ErrorCode, primary_label: Label) -> Self {
        assert!(
            matches!(error_code.level, DiagnosticLevel::Error),
            "Tried to create an error diagnostic with a non-error code."
        );
        Self::new(error_code, primary_label)
    }

    /// 覆盖默认消息，以包含动态信息（具体的标识符名、类型名等）。
    pub fn with_dynamic_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_secondary_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn code(&self) -> &str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 主标签的起始字节偏移，用于按源文件位置排序。
    fn position(&self) -> usize {
        self.labels.first().map(|l| l.span.start).unwrap_or(0)
    }
}

// --- 词法 / 语法错误到 Diagnostic 的转换 ---
// （语义错误的转换表在 analyzer::semantic_error 中。）

impl From<&LexerError> for Diagnostic {
    fn from(error: &LexerError) -> Self {
        match error {
            LexerError::UnrecognizedToken {
                unrecognized_char,
                span,
            } => Diagnostic::error(
                &codes::E0000_UNRECOGNIZED_CHAR,
                Label::new(
                    Span::from(*span),
                    format!("the character '{}' cannot be recognized", unrecognized_char),
                ),
            )
            .with_dynamic_message(error.to_string()),
        }
    }
}

impl From<&ParserError> for Diagnostic {
    fn from(error: &ParserError) -> Self {
        let (code, span) = match error {
            ParserError::UnexpectedToken { span, .. } => (&codes::E0100_SYNTAX_ERROR, span),
            ParserError::UnexpectedEof { span, .. } => (&codes::E0101_UNEXPECTED_EOF, span),
        };
        Diagnostic::error(code, Label::new(Span::from(*span), "here"))
            .with_dynamic_message(error.to_string())
    }
}

impl From<&CompilerError> for Diagnostic {
    fn from(error: &CompilerError) -> Self {
        match error {
            CompilerError::Lexical(e) => e.into(),
            CompilerError::Parsing(e) => e.into(),
            CompilerError::Semantic(e) => e.into(),
        }
    }
}

// --- DiagnosticBag ---

#[derive(Debug, Default)]
pub struct DiagnosticBag {
    source: String,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            diagnostics: Vec::new(),
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level == DiagnosticLevel::Error)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// 按源文件位置排序后打印所有积累的诊断，并清空背包。
    pub fn print(&mut self, file_name: &str) {
        let mut diags_to_print = mem::take(&mut self.diagnostics);
        diags_to_print.sort_by_key(|d| d.position());
        if !diags_to_print.is_empty() {
            print_all(file_name, &self.source, diags_to_print);
        }
    }
}

// --- Printer 打印逻辑 ---

fn print_all(file_name: &str, source_code: &str, diagnostics: Vec<Diagnostic>) {
    let cache = (file_name, Source::from(source_code));

    for diag in diagnostics {
        if diag.labels.is_empty() {
            continue;
        }

        let kind = match diag.level {
            DiagnosticLevel::Error => ReportKind::Error,
            DiagnosticLevel::Warning => ReportKind::Warning,
        };

        let color = match diag.level {
            DiagnosticLevel::Error => Color::Red,
            DiagnosticLevel::Warning => Color::Yellow,
        };

        let primary_span: Range<usize> = diag.labels[0].span.into();

        let mut report = Report::build(kind, (file_name, primary_span))
            .with_message(&diag.message)
            .with_code(diag.code);

        for (i, label_info) in diag.labels.iter().enumerate() {
            let range: Range<usize> = label_info.span.into();
            let label = AriadneLabel::new((file_name, range)).with_message(&label_info.message);

            let final_label = if i == 0 {
                label.with_color(color)
            } else {
                label.with_color(Color::Blue)
            };
            report.add_label(final_label);
        }

        for note in &diag.notes {
            report = report.with_note(note);
        }

        report.finish().eprint(cache.clone()).unwrap();
    }
}
