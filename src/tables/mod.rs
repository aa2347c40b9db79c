//! 表ファイル入出力（CSV / Excel）

mod workbook;

use crate::error::{BugakariError, Result};
use bugakari_common::types::{MATCH_REQUIRED_COLUMNS, RAW_FIELD_COUNT, ROAD_ITEM_COLUMNS};
use bugakari_common::{KeywordDictionary, KeywordEntry, NormalizedUnitPriceRow, RawRow, RoadItem};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;
use std::path::Path;

pub use workbook::read_workbook_items;

const UTF8_BOM: char = '\u{feff}';

/// 入力ファイルの存在確認
pub fn ensure_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(BugakariError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

/// BOMを除いたファイル内容
fn read_text(path: &Path) -> Result<String> {
    ensure_exists(path)?;
    let content = std::fs::read_to_string(path)?;
    Ok(match content.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => content,
    })
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_lowercase().as_str(), "xlsx" | "xlsm" | "xls" | "ods"))
        .unwrap_or(false)
}

/// 必須列の位置（見出しは前後空白を無視）
pub(crate) fn require_columns(headers: &[String], required: &[&str], file: &Path) -> Result<Vec<usize>> {
    required
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|h| h.trim() == *column)
                .ok_or_else(|| BugakariError::MissingColumn {
                    file: file.display().to_string(),
                    column: column.to_string(),
                })
        })
        .collect()
}

fn header_names(record: &StringRecord) -> Vec<String> {
    record.iter().map(|h| h.trim().to_string()).collect()
}

/// ヘッダーなしCSVを行ごとに読む（列数は行ごとに可変）
pub fn read_lines(path: &Path) -> Result<Vec<Vec<String>>> {
    let text = read_text(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// 7列の生データ表を読む
///
/// 7列を超える行は7列目以降をカンマで連結する。空行は捨てる。
pub fn read_raw_rows(path: &Path) -> Result<Vec<RawRow>> {
    let lines = read_lines(path)?;
    let mut rows = Vec::with_capacity(lines.len());

    for (index, fields) in lines.iter().enumerate() {
        if fields.len() > RAW_FIELD_COUNT {
            tracing::warn!(row = index + 1, fields = fields.len(), "row wider than 7 fields, joining the tail");
        }
        if let Some(row) = RawRow::from_fields(fields) {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// ヘッダーなしで行を書き出す
pub fn write_lines<R: AsRef<[String]>>(path: &Path, rows: &[R], quote_all: bool) -> Result<()> {
    create_parent(path)?;
    let quote_style = if quote_all { QuoteStyle::Always } else { QuoteStyle::Necessary };
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote_style(quote_style)
        .from_path(path)?;

    for row in rows {
        writer.write_record(row.as_ref())?;
    }
    writer.flush()?;
    Ok(())
}

/// 生データ行を書き出す（全フィールドを引用符で囲む）
pub fn write_raw_rows(path: &Path, rows: &[RawRow]) -> Result<()> {
    let fields: Vec<&[String]> = rows.iter().map(|r| r.fields.as_slice()).collect();
    write_lines(path, &fields, true)
}

/// ヘッダー付きCSVを書き出す
///
/// 0件のときもヘッダー行は出力する。
pub fn write_table<T: Serialize>(path: &Path, columns: &[&str], records: &[T]) -> Result<()> {
    create_parent(path)?;
    let mut writer = WriterBuilder::new().from_path(path)?;

    if records.is_empty() {
        writer.write_record(columns)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// 正規化済み単価表を読む
///
/// 照合に必要な列がなければエラー。その他の列は空欄扱い。
pub fn read_normalized_rows(path: &Path) -> Result<Vec<NormalizedUnitPriceRow>> {
    let text = read_text(path)?;
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(text.as_bytes());

    let headers = header_names(reader.headers()?);
    require_columns(&headers, &MATCH_REQUIRED_COLUMNS, path)?;
    reader.set_headers(StringRecord::from(headers));

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// 道路工事アイテム表を読む（CSV または Excel の先頭シート）
pub fn read_road_items(path: &Path) -> Result<Vec<RoadItem>> {
    if is_workbook(path) {
        return read_workbook_items(path);
    }

    let text = read_text(path)?;
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(text.as_bytes());

    let headers = header_names(reader.headers()?);
    require_columns(&headers, &ROAD_ITEM_COLUMNS, path)?;
    reader.set_headers(StringRecord::from(headers));

    let mut items = Vec::new();
    for item in reader.deserialize() {
        items.push(item?);
    }
    Ok(items)
}

/// 歩掛カテゴリ辞書を読む（ファイルがなければ空の辞書）
pub fn read_keyword_dictionary(path: Option<&Path>) -> Result<KeywordDictionary> {
    let Some(path) = path else {
        return Ok(KeywordDictionary::default());
    };
    if !path.is_file() {
        tracing::info!(path = %path.display(), "keyword map not found, using built-in rules only");
        return Ok(KeywordDictionary::default());
    }

    let text = read_text(path)?;
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(text.as_bytes());
    let headers = header_names(reader.headers()?);
    reader.set_headers(StringRecord::from(headers));

    let mut entries: Vec<KeywordEntry> = Vec::new();
    for entry in reader.deserialize() {
        entries.push(entry?);
    }
    Ok(KeywordDictionary::from_entries(&entries))
}
