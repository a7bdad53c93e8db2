//! Manual retrieval instructions shown next to the download action

use crate::catalog::ModelRecord;

/// Copy-pasteable commands for fetching `model_id` by hand.
pub fn download_command(model_id: &str) -> String {
    format!(
        "# Using Hugging Face CLI\n\
         huggingface-cli download {model_id}\n\
         \n\
         # Or using Python transformers\n\
         from transformers import AutoModel, AutoTokenizer\n\
         model = AutoModel.from_pretrained(\"{model_id}\")\n\
         tokenizer = AutoTokenizer.from_pretrained(\"{model_id}\")"
    )
}

/// What a user needs before pulling the full model.
pub fn requirements(record: &ModelRecord) -> Vec<String> {
    let mut items = vec![
        "Hugging Face account and authentication token".to_string(),
        "Sufficient disk space for model files".to_string(),
    ];
    if let Some(gpu) = record.best_gpu.first() {
        items.push(format!("Recommended GPU: {}", gpu.replace('_', " ")));
    }
    items.push("Python 3.8+ and transformers library".to_string());
    items
}
