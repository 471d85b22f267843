use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};

/// One row of the performance table. Risk is derived at read time and is
/// deliberately not part of the stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub student_id: String,
    pub name: String,
    pub marks: f64,
    pub attendance: f64,
    pub logins: i64,
}

/// The whole table, loaded once and held in memory. Every mutation rewrites
/// the backing file wholesale (tmp file + rename, so a crash mid-write never
/// leaves a half-written table behind).
#[derive(Debug)]
pub struct Dataset {
    path: PathBuf,
    records: Vec<StudentRecord>,
}

const HEADER: &str = "StudentID,Name,Marks,Attendance,Logins";

impl Dataset {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset {}", path.to_string_lossy()))?;
        let records = parse_table(&text)
            .with_context(|| format!("failed to parse dataset {}", path.to_string_lossy()))?;
        log::info!(
            "loaded {} records from {}",
            records.len(),
            path.to_string_lossy()
        );
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// An empty table over a file that does not exist yet. The header is
    /// written on the first save.
    pub fn create(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            records: Vec::new(),
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let mut out = String::from(HEADER);
        out.push('\n');
        for r in &self.records {
            out.push_str(&format!(
                "{},{},{},{},{}\n",
                csv_quote(&r.student_id),
                csv_quote(&r.name),
                format_number(r.marks),
                format_number(r.attendance),
                r.logins
            ));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create directory {}", parent.to_string_lossy())
                })?;
            }
        }
        let tmp = self.path.with_extension("csv.saving");
        std::fs::write(&tmp, &out)
            .with_context(|| format!("failed to write {}", tmp.to_string_lossy()))?;
        std::fs::rename(&tmp, &self.path).with_context(|| {
            format!("failed to replace dataset {}", self.path.to_string_lossy())
        })?;
        log::info!(
            "saved {} records to {}",
            self.records.len(),
            self.path.to_string_lossy()
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Next sequential ID: one past the highest numeric suffix in the table,
    /// zero-padded to at least three digits.
    pub fn next_student_id(&self) -> String {
        let max = self
            .records
            .iter()
            .filter_map(|r| parse_id_number(&r.student_id))
            .max()
            .unwrap_or(0);
        format!("S{:03}", max + 1)
    }

    pub fn contains_id(&self, student_id: &str) -> bool {
        self.records
            .iter()
            .any(|r| r.student_id.eq_ignore_ascii_case(student_id))
    }

    /// Exact-duplicate probe used by the admission form: same name
    /// (case-insensitive) and identical marks/attendance/logins.
    pub fn find_duplicate(
        &self,
        name: &str,
        marks: f64,
        attendance: f64,
        logins: i64,
    ) -> Option<&StudentRecord> {
        self.records.iter().find(|r| {
            r.name.eq_ignore_ascii_case(name)
                && r.marks == marks
                && r.attendance == attendance
                && r.logins == logins
        })
    }

    /// Case-insensitive substring match over StudentID and Name.
    pub fn search(&self, query: &str) -> Vec<&StudentRecord> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|r| {
                r.student_id.to_lowercase().contains(&q) || r.name.to_lowercase().contains(&q)
            })
            .collect()
    }

    pub fn append(&mut self, record: StudentRecord) {
        self.records.push(record);
    }

    /// Remove by exact StudentID (case-insensitive). Returns the removed
    /// record; IDs are unique so at most one row goes.
    pub fn remove(&mut self, student_id: &str) -> Option<StudentRecord> {
        let idx = self
            .records
            .iter()
            .position(|r| r.student_id.eq_ignore_ascii_case(student_id))?;
        Some(self.records.remove(idx))
    }
}

fn parse_id_number(id: &str) -> Option<u64> {
    id.trim().trim_start_matches(['S', 's']).parse().ok()
}

fn parse_table(text: &str) -> anyhow::Result<Vec<StudentRecord>> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header_line = lines
        .next()
        .ok_or_else(|| anyhow!("dataset has no header row"))?;
    let header = parse_csv_record(header_line);

    let col = |name: &str| {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let id_col = col("StudentID");
    let name_col = col("Name").ok_or_else(|| anyhow!("missing Name column"))?;
    let marks_col = col("Marks").ok_or_else(|| anyhow!("missing Marks column"))?;
    let attendance_col = col("Attendance").ok_or_else(|| anyhow!("missing Attendance column"))?;
    let logins_col = col("Logins").ok_or_else(|| anyhow!("missing Logins column"))?;

    let field = |fields: &[String], idx: usize, line_no: usize, what: &str| {
        fields
            .get(idx)
            .map(|s| s.trim().to_string())
            .ok_or_else(|| anyhow!("row {}: missing {} field", line_no, what))
    };

    let mut records = Vec::new();
    for (i, line) in lines.enumerate() {
        let line_no = i + 2;
        let fields = parse_csv_record(line);

        // Older files carry no StudentID column; synthesize positionally.
        let student_id = match id_col {
            Some(c) => {
                let v = field(&fields, c, line_no, "StudentID")?;
                if v.is_empty() {
                    format!("S{:03}", records.len() + 1)
                } else {
                    v
                }
            }
            None => format!("S{:03}", records.len() + 1),
        };

        let marks: f64 = field(&fields, marks_col, line_no, "Marks")?
            .parse()
            .with_context(|| format!("row {}: Marks is not numeric", line_no))?;
        let attendance: f64 = field(&fields, attendance_col, line_no, "Attendance")?
            .parse()
            .with_context(|| format!("row {}: Attendance is not numeric", line_no))?;
        let logins: i64 = field(&fields, logins_col, line_no, "Logins")?
            .parse()
            .with_context(|| format!("row {}: Logins is not an integer", line_no))?;

        records.push(StudentRecord {
            student_id,
            name: field(&fields, name_col, line_no, "Name")?,
            marks,
            attendance,
            logins,
        });
    }
    Ok(records)
}

/// Integral values print without a trailing ".0" so a save/load cycle is
/// byte-stable for the common whole-number case.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}

pub fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

pub fn parse_csv_record(line: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0usize;
    while i < chars.len() {
        let ch = chars[i];
        if ch == '"' {
            if in_quotes && i + 1 < chars.len() && chars[i + 1] == '"' {
                buf.push('"');
                i += 2;
                continue;
            }
            in_quotes = !in_quotes;
            i += 1;
            continue;
        }
        if ch == ',' && !in_quotes {
            out.push(buf);
            buf = String::new();
            i += 1;
            continue;
        }
        buf.push(ch);
        i += 1;
    }
    out.push(buf);
    out
}
