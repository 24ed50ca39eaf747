use modbus_dashboard::config::Language;
use modbus_dashboard::data::error::DatasetError;
use modbus_dashboard::state::StatusMessage;

// ---------------------------------------------------------------------------
// Localized UI strings
// ---------------------------------------------------------------------------

/// Every user-visible string of the shell.
pub struct UiText {
    pub language: Language,
    pub title: &'static str,
    pub menu_file: &'static str,
    pub menu_open: &'static str,
    pub dialog_title: &'static str,
    pub no_dataset: &'static str,
    pub rows_loaded: &'static str,
    pub rows_selected: &'static str,
    pub show_all: &'static str,
    pub time_range_heading: &'static str,
    pub mode_label: &'static str,
    pub mode_all: &'static str,
    pub mode_range: &'static str,
    pub select_date: &'static str,
    pub enter_time: &'static str,
    pub enter_minutes: &'static str,
    pub parameters_heading: &'static str,
    pub center_parameter: &'static str,
    pub additional_parameters: &'static str,
    pub visualization_heading: &'static str,
    pub value_axis: &'static str,
}

pub static EN: UiText = UiText {
    language: Language::En,
    title: "📊 DASHBOARD",
    menu_file: "File",
    menu_open: "Open…",
    dialog_title: "Select CSV file",
    no_dataset: "Open a CSV file to begin  (File → Open…)",
    rows_loaded: "rows loaded",
    rows_selected: "selected",
    show_all: "Show all data",
    time_range_heading: "⏰ Select time range",
    mode_label: "Selection mode:",
    mode_all: "All",
    mode_range: "Select by time range",
    select_date: "Select date",
    enter_time: "Enter time (HH:MM:SS):",
    enter_minutes: "Enter number of minutes (-1 for all):",
    parameters_heading: "🔎 Select parameters to visualize",
    center_parameter: "Select center parameter:",
    additional_parameters: "Select additional parameters:",
    visualization_heading: "📈 Data Visualization",
    value_axis: "Value",
};

pub static VI: UiText = UiText {
    language: Language::Vi,
    title: "📊 BẢNG ĐIỀU KHIỂN",
    menu_file: "Tệp",
    menu_open: "Mở…",
    dialog_title: "Chọn tệp CSV",
    no_dataset: "Mở một tệp CSV để bắt đầu  (Tệp → Mở…)",
    rows_loaded: "dòng đã tải",
    rows_selected: "được chọn",
    show_all: "Hiển thị toàn bộ dữ liệu",
    time_range_heading: "⏰ Chọn khoảng thời gian",
    mode_label: "Chế độ chọn:",
    mode_all: "Tất cả",
    mode_range: "Chọn theo khoảng thời gian",
    select_date: "Chọn ngày",
    enter_time: "Nhập giờ (HH:MM:SS):",
    enter_minutes: "Nhập số phút (-1 để lấy tất cả):",
    parameters_heading: "🔎 Chọn thông số để hiển thị",
    center_parameter: "Chọn thông số trung tâm:",
    additional_parameters: "Chọn thêm thông số:",
    visualization_heading: "📈 Trực quan hóa dữ liệu",
    value_axis: "Giá trị",
};

impl UiText {
    pub fn for_language(language: Language) -> &'static UiText {
        match language {
            Language::En => &EN,
            Language::Vi => &VI,
        }
    }

    /// Message for a dataset or input problem, with its severity marker.
    pub fn dataset_error(&self, err: &DatasetError) -> String {
        if self.language == Language::En {
            let marker = if err.is_warning() || matches!(err, DatasetError::InvalidTimeOfDay(_)) {
                "⚠️"
            } else {
                "❌"
            };
            return format!("{marker} {err}");
        }
        match err {
            DatasetError::MissingTimeColumn => "❌ Tệp không có cột 'time'.".to_string(),
            DatasetError::NoFeatureColumns => "❌ Không có cột nào chứa 'First'.".to_string(),
            DatasetError::UnparsableTimeColumn => {
                "❌ Không đọc được thời gian trong cột 'time'.".to_string()
            }
            DatasetError::InvalidTimeOfDay(text) => {
                format!("⚠️ Sai định dạng giờ '{text}'! Vui lòng nhập theo dạng HH:MM:SS.")
            }
            DatasetError::EmptyWindow => {
                "⚠️ Không có dữ liệu trong khoảng thời gian này!".to_string()
            }
        }
    }

    pub fn status(&self, status: &StatusMessage) -> String {
        match status {
            StatusMessage::Dataset(err) => self.dataset_error(err),
            StatusMessage::Io(msg) => format!("❌ {msg}"),
        }
    }
}
