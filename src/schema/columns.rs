//! Column labels, as shown in table headings and form fields.

pub const BRANCH_NAME: &str = "Branch Name";
pub const BRANCH_LOCATION: &str = "Branch Location";
pub const TOTAL_CELL_VENUES: &str = "Total Cell Venues";
pub const BRANCH_STATUS: &str = "Branch Status";

pub const MEMBER_NAME: &str = "Member Name";
pub const DATE_OF_BIRTH: &str = "Date of Birth";
pub const EMAIL: &str = "Email";
pub const PHONE: &str = "Phone";
pub const GENDER: &str = "Gender";
pub const STATUS: &str = "Status";

pub const STAFF_NAME: &str = "Staff Name";
pub const PCF: &str = "PCF";
pub const ROLE: &str = "Role";

pub const MEETING_DAY: &str = "Meeting Day";
pub const TOTAL_ATTENDANCE: &str = "Total Attn.";
pub const MALE_ATTENDANCE: &str = "Male Attn.";
pub const FEMALE_ATTENDANCE: &str = "Female Attn.";
pub const NEW_CONVERTS: &str = "New Converts";
pub const FIRST_TIMERS: &str = "First Timers";
pub const DATE_OF_MEETING: &str = "Date of Meeting";

pub const PCF_PASTOR: &str = "PCF Pastor";
pub const CELL_LEADER: &str = "Cell Leader";
pub const SUNDAY_SERVICE_ATTENDANCE: &str = "Sunday Service Attn.";
pub const TOTAL_OFFERING: &str = "Total Offering";
