use serde::{Deserialize, Deserializer, Serialize};

/// Accepts a JSON string, number or null and yields its text form.
///
/// Lesson numbers and quantities were typed by hand in older data and show up
/// as both `"5"` and `5`; either way they are written back as strings.
fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    Ok(match v {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

fn loose_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    Ok(match v {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    #[serde(default)]
    pub teacher_name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub day_of_week: String,
    #[serde(default, deserialize_with = "loose_i64")]
    pub period: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "loose_i64")]
    pub week: i64,
    #[serde(default)]
    pub day_of_week: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "loose_i64")]
    pub period: i64,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub ppct_number: String,
    #[serde(default)]
    pub lesson_name: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub teacher_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRow {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "loose_i64")]
    pub week: i64,
    #[serde(default)]
    pub day_of_week: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "loose_i64")]
    pub period: i64,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub ppct_number: String,
    #[serde(default)]
    pub equipment_name: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub quantity: String,
    #[serde(default)]
    pub teacher_name: String,
}

impl EquipmentRow {
    /// Same lesson slot: the alignment key shared with [`ScheduleRow`].
    pub fn same_slot(&self, row: &ScheduleRow) -> bool {
        self.week == row.week && self.day_of_week == row.day_of_week && self.period == row.period
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PpctEntry {
    #[serde(default)]
    pub subject: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub lesson_number: String,
    #[serde(default)]
    pub lesson_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentConfigEntry {
    #[serde(default)]
    pub subject: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub lesson_number: String,
    #[serde(default)]
    pub equipment_name: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub quantity: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppTab {
    #[default]
    Timetable,
    Ppct,
    DeviceList,
    Schedule,
    Equipment,
}

impl AppTab {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timetable => "TIMETABLE",
            Self::Ppct => "PPCT",
            Self::DeviceList => "DEVICE_LIST",
            Self::Schedule => "SCHEDULE",
            Self::Equipment => "EQUIPMENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "TIMETABLE" => Some(Self::Timetable),
            "PPCT" => Some(Self::Ppct),
            "DEVICE_LIST" => Some(Self::DeviceList),
            "SCHEDULE" => Some(Self::Schedule),
            "EQUIPMENT" => Some(Self::Equipment),
            _ => None,
        }
    }
}

/// Rows that belong to one teacher's partition of a global list.
pub trait TeacherOwned {
    fn teacher_name(&self) -> &str;
    fn set_teacher_name(&mut self, name: &str);
}

impl TeacherOwned for ScheduleRow {
    fn teacher_name(&self) -> &str {
        &self.teacher_name
    }

    fn set_teacher_name(&mut self, name: &str) {
        self.teacher_name = name.to_string();
    }
}

impl TeacherOwned for EquipmentRow {
    fn teacher_name(&self) -> &str {
        &self.teacher_name
    }

    fn set_teacher_name(&mut self, name: &str) {
        self.teacher_name = name.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_lesson_numbers_decode_as_text() {
        let entry: PpctEntry = serde_json::from_value(json!({
            "subject": "KHTN",
            "lessonNumber": 6,
            "lessonName": "Tế bào"
        }))
        .expect("decode ppct");
        assert_eq!(entry.lesson_number, "6");

        let cfg: EquipmentConfigEntry = serde_json::from_value(json!({
            "subject": "KHTN",
            "lessonNumber": "6",
            "equipmentName": "Kính hiển vi",
            "quantity": null
        }))
        .expect("decode config");
        assert_eq!(cfg.quantity, "");
    }

    #[test]
    fn rows_serialize_with_browser_field_names() {
        let row = ScheduleRow {
            week: 13,
            day_of_week: "Thứ 2".into(),
            ppct_number: "1".into(),
            ..Default::default()
        };
        let v = serde_json::to_value(&row).expect("encode row");
        assert_eq!(v["dayOfWeek"], json!("Thứ 2"));
        assert_eq!(v["ppctNumber"], json!("1"));
        assert_eq!(v["week"], json!(13));
    }

    #[test]
    fn tab_ids_match_stored_text() {
        assert_eq!(
            serde_json::to_value(AppTab::DeviceList).expect("encode tab"),
            json!("DEVICE_LIST")
        );
        assert_eq!(AppTab::parse("SCHEDULE"), Some(AppTab::Schedule));
        assert_eq!(AppTab::parse("settings"), None);
    }
}
