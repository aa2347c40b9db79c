//! Excel（xlsx/xls/ods）からの道路工事アイテム読み込み

use super::{ensure_exists, require_columns};
use crate::error::{BugakariError, Result};
use bugakari_common::types::ROAD_ITEM_COLUMNS;
use bugakari_common::RoadItem;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

fn cell_text(row: &[Data], index: usize) -> String {
    row.get(index)
        .map(|cell| cell.to_string().trim().to_string())
        .unwrap_or_default()
}

/// 先頭シートを読む（1行目は見出し）
pub fn read_workbook_items(path: &Path) -> Result<Vec<RoadItem>> {
    ensure_exists(path)?;

    let mut workbook = open_workbook_auto(path).map_err(|e| BugakariError::Excel(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| BugakariError::Excel(format!("シートがありません: {}", path.display())))?
        .map_err(|e| BugakariError::Excel(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => Vec::new(),
    };
    let columns = require_columns(&headers, &ROAD_ITEM_COLUMNS, path)?;

    let items = rows
        .map(|row| RoadItem {
            category: cell_text(row, columns[0]),
            subcategory: cell_text(row, columns[1]),
            item_name: cell_text(row, columns[2]),
        })
        .collect();
    Ok(items)
}
