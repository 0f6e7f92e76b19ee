use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use extracto_categorize::Categorizer;
use extracto_core::SourceDocument;
use extracto_statement::{
    dump, BatchOutcome, InMemorySource, Normalizer, StatementPipeline,
};

use crate::config;
use crate::export;

pub struct ProcessOptions {
    pub inputs: Vec<PathBuf>,
    pub rules: Option<PathBuf>,
    pub dictionary: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub summary: bool,
}

/// Run every input through the pipeline and write the records as CSV.
/// Per-block and per-document failures are reported, not fatal.
pub fn process(options: &ProcessOptions) -> Result<BatchOutcome> {
    let rules = config::load_rules(options.rules.as_deref())?;
    let dictionary = config::load_dictionary(options.dictionary.as_deref())?;
    let pipeline = StatementPipeline::new(Normalizer::new(dictionary), Categorizer::new(rules));

    let source = collect_documents(&options.inputs)?;
    let batch = pipeline.process_batch(&source, &source.documents());

    let written = match &options.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create output file {}", path.display()))?;
            export::write_records(BufWriter::new(file), batch.records())
                .with_context(|| format!("write {}", path.display()))?
        }
        None => export::write_records(io::stdout().lock(), batch.records())
            .context("write records to stdout")?,
    };

    for outcome in &batch.outcomes {
        for failure in &outcome.failures {
            tracing::warn!(
                document = %outcome.source_document,
                line = failure.line_number,
                "{}",
                failure.error
            );
        }
    }
    for failure in &batch.failures {
        tracing::warn!(document = %failure.document, "{}", failure.error);
    }

    if options.summary {
        let mut err = io::stderr().lock();
        for outcome in &batch.outcomes {
            let summary = outcome.summary();
            if summary.total_income.is_none() || summary.total_expense.is_none() {
                tracing::warn!(document = %outcome.source_document, "totals overflowed");
            }
            serde_json::to_writer(&mut err, &summary)?;
            writeln!(err)?;
        }
    }

    tracing::info!(
        records = written,
        failed_blocks = batch.failed_block_count(),
        failed_documents = batch.documents_failed(),
        "export finished"
    );
    Ok(batch)
}

/// Read each input into memory. Directories contribute their `*.txt` files,
/// dumps are split into their documents, and unreadable files become
/// unreadable documents rather than errors.
pub fn collect_documents(inputs: &[PathBuf]) -> Result<InMemorySource> {
    let mut source = InMemorySource::new();
    for input in inputs {
        if input.is_dir() {
            for file in text_files_in(input)? {
                add_file(&mut source, &file);
            }
        } else {
            add_file(&mut source, input);
        }
    }
    Ok(source)
}

fn add_file(source: &mut InMemorySource, path: &Path) {
    let document = SourceDocument::new(path.display().to_string());
    match fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            if dump::is_dump(&text) {
                source.add_dump(&text);
            } else {
                source.add_text(document, text.into_owned());
            }
        }
        Err(e) => source.add_unreadable(document, e.to_string()),
    }
}

fn text_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("read input directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "txt"))
        .collect();
    files.sort();
    Ok(files)
}

/// Categorize a single operation and print the result as JSON.
pub fn categorize<W: Write>(
    rules: Option<&Path>,
    operation: &str,
    merchant: &str,
    out: &mut W,
) -> Result<()> {
    let categorizer = Categorizer::new(config::load_rules(rules)?);
    let categorization = categorizer.categorize(operation, merchant);
    serde_json::to_writer(&mut *out, &categorization)?;
    writeln!(out)?;
    Ok(())
}

/// Print each line after normalization.
pub fn normalize<W: Write>(dictionary: Option<&Path>, lines: &[String], out: &mut W) -> Result<()> {
    let normalizer = Normalizer::new(config::load_dictionary(dictionary)?);
    for line in lines {
        writeln!(out, "{}", normalizer.normalize(line))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATEMENT: &str = "\
EXTRACTO DE SEPTIEMBRE 2025
01/09 02/09 PAGO CON TARJETA EN RESTAURANTES -12,50 1.234,56
1234567890123456BAR CENTRAL ALICANTE
02/09 02/09 PAGO CON TARJETA abc,00 1.234,56
03/09 03/09 PAGOCONTARJETAENSUPERMERCADOS -45,30 1.189,26
1234567890123456MERCADONA ELCHE
";

    #[test]
    fn process_writes_csv_and_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let statement = dir.path().join("septiembre.txt");
        fs::write(&statement, STATEMENT).unwrap();
        let rules = dir.path().join("reglas.json");
        fs::write(
            &rules,
            r#"{"mapeo_categorias":[{"palabra_clave":"MERCADONA","categoria":"Alimentacion","subcategoria":"Supermercado"}]}"#,
        )
        .unwrap();
        let output = dir.path().join("out.csv");

        let batch = process(&ProcessOptions {
            inputs: vec![statement, dir.path().join("falta.txt")],
            rules: Some(rules),
            dictionary: None,
            output: Some(output.clone()),
            summary: false,
        })
        .unwrap();

        assert_eq!(batch.record_count(), 2);
        assert_eq!(batch.failed_block_count(), 1);
        assert_eq!(batch.documents_failed(), 1);

        let csv = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("operation_date,value_date,operation"));
        assert!(lines[1].contains(",FOOD,RESTAURANT,9,2025,"));
        assert!(lines[2].contains(",Alimentacion,Supermercado,9,2025,"));
    }

    #[test]
    fn collect_documents_reads_directories_and_dumps() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), STATEMENT).unwrap();
        fs::write(
            dir.path().join("b.txt"),
            "ARCHIVO: uno.pdf\n01/09 01/09 X -1,00 2,00\nARCHIVO: dos.pdf\nERROR\n",
        )
        .unwrap();
        fs::write(dir.path().join("c.csv"), "ignored").unwrap();

        let source = collect_documents(&[dir.path().to_path_buf()]).unwrap();
        let docs = source.documents();
        assert_eq!(docs.len(), 3);
        assert!(docs[0].as_str().ends_with("a.txt"));
        assert_eq!(docs[1], SourceDocument::new("uno.pdf"));
        assert_eq!(docs[2], SourceDocument::new("dos.pdf"));
    }

    #[test]
    fn categorize_prints_json() {
        let mut out = Vec::new();
        categorize(None, "PAGO CON TARJETA EN RESTAURANTES", "BAR", &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["category"], "FOOD");
        assert_eq!(json["subcategory"], "RESTAURANT");
    }

    #[test]
    fn normalize_prints_each_line() {
        let mut out = Vec::new();
        normalize(None, &["PAGOCONTARJETA".to_string(), "8TZUN".to_string()], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "PAGO CON TARJETA\nBIZUM\n");
    }
}
