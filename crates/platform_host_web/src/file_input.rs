//! Reads user-picked files from an `<input type="file">` into [`SelectedFile`] records.

use platform_host::SelectedFile;

/// Reads the first file chosen in `input`, or `Ok(None)` when nothing is selected.
pub async fn first_selected_file(
    input: &web_sys::HtmlInputElement,
) -> Result<Option<SelectedFile>, String> {
    let Some(file) = input.files().and_then(|files| files.get(0)) else {
        return Ok(None);
    };
    read_selected_file(&file).await.map(Some)
}

/// Reads one browser [`web_sys::File`] fully into memory.
pub async fn read_selected_file(file: &web_sys::File) -> Result<SelectedFile, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("failed to read `{}`: {e:?}", file.name()))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(SelectedFile::new(file.name(), file.type_(), bytes))
}
