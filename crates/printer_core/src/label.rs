//! ZPL payload for the 73-dot label stock.

const LABEL_HEIGHT: i32 = 73;
const TEXT_X: i32 = 155;
const BARCODE_X: i32 = 0;
const MAX_NAME_CHARS: usize = 28;

/// Barcode of `item_id` on the left, `item_name` to its right.
pub fn format_label(item_id: &str, item_name: &str) -> String {
    let center_y = LABEL_HEIGHT / 2;
    let text_y = center_y - 10;
    let barcode_y = center_y - 7;
    let name: String = item_name.chars().take(MAX_NAME_CHARS).collect();

    let barcode = format!("^FT{BARCODE_X},{barcode_y}^BY1^BCN,30,Y,N,N^FD{item_id}^FS");
    let text = format!("^FT{TEXT_X},{text_y}^A0N,18,18^FD{name}^FS");
    format!("^XA{barcode}{text}^XZ")
}
