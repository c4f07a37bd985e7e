use std::path::Path;

/// Write the single-column artifact: one quoted-as-needed CSV field per line,
/// CRLF terminated. The caller passes the header as the first element.
pub fn write_onecol_csv(path: &Path, lines: &[String]) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_path(path)
        .map_err(|e| e.to_string())?;

    for line in lines {
        writer.write_record([line.as_str()]).map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}
