//! OCRテキスト行の分類（表 / 単価表）

/// 分類結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedRows {
    /// 表題に「表」を含む行
    pub tables: Vec<Vec<String>>,
    /// 表題に「単価表」を含む行
    pub unit_price_tables: Vec<Vec<String>>,
}

/// 2列目（表題）で行を振り分ける
///
/// 1列しかない行、表題に「表」を含まない行は捨てる。
pub fn classify_rows(rows: Vec<Vec<String>>) -> ClassifiedRows {
    let mut classified = ClassifiedRows::default();

    for row in rows {
        if row.len() <= 1 {
            continue;
        }
        if row[1].contains("単価表") {
            classified.unit_price_tables.push(row);
        } else if row[1].contains('表') {
            classified.tables.push(row);
        }
    }

    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_rows() {
        let rows = vec![
            row(&["土工", "掘削工 100m³当り単価表", "普通作業員"]),
            row(&["土工", "表-1 掘削工の規格", "a"]),
            row(&["土工", "本文", "b"]),
            row(&["単価表のみ"]),
        ];
        let classified = classify_rows(rows);
        assert_eq!(classified.unit_price_tables.len(), 1);
        assert_eq!(classified.tables.len(), 1);
        assert_eq!(classified.tables[0][1], "表-1 掘削工の規格");
    }
}
