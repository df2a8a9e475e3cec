/// Canonical catalog of event category tags. Event tags are validated
/// against this list at creation and update time.
pub const ALL_TAGS: &[&str] = &[
    "WORKSHOP",
    "SEMINAR",
    "LECTURE",
    "STUDY_SESSION",
    "HACKATHON",
    "BOOTCAMP",
    "RESEARCH_SYMPOSIUM",
    "COMPETITION",
    "EXAM_PREP",
    "TUTORING",
    "CAREER_FAIR",
    "INFO_SESSION",
    "NETWORKING",
    "RESUME_CLINIC",
    "INTERVIEW_PREP",
    "INTERNSHIP_FAIR",
    "COMPANY_VISIT",
    "PANEL_DISCUSSION",
    "ALUMNI_MEETUP",
    "ENTREPRENEURSHIP",
    "PARTY",
    "MIXER",
    "CLUB_FAIR",
    "GAME_NIGHT",
    "MOVIE_NIGHT",
    "CULTURAL_FESTIVAL",
    "CONCERT",
    "TALENT_SHOW",
    "STUDENT_GALA",
    "SPORTS_GAME",
    "FUNDRAISER",
    "CHARITY_EVENT",
    "CLEANUP_DRIVE",
    "BLOOD_DRIVE",
    "VOLUNTEERING",
    "AWARENESS_CAMPAIGN",
    "DONATION_DRIVE",
    "MENTORSHIP",
    "MEDITATION",
    "YOGA",
    "FITNESS_CLASS",
    "MENTAL_HEALTH",
    "SELF_DEVELOPMENT",
    "MINDFULNESS",
    "NUTRITION_TALK",
    "COUNSELING_SESSION",
    "CODING_CHALLENGE",
    "TECH_TALK",
    "AI_ML_WORKSHOP",
    "STARTUP_PITCH",
    "ROBOTICS_DEMO",
    "CYBERSECURITY",
    "PRODUCT_SHOWCASE",
    "CULTURAL_NIGHT",
    "LANGUAGE_EXCHANGE",
    "INTERNATIONAL_MEETUP",
    "PRIDE_EVENT",
    "HERITAGE_CELEBRATION",
    "INCLUSION_WORKSHOP",
    "ART_EXHIBIT",
    "PHOTOGRAPHY_CONTEST",
    "FILM_SCREENING",
    "THEATER_PLAY",
    "OPEN_MIC",
    "DANCE_PERFORMANCE",
    "MUSIC_JAM",
    "ECO_WORKSHOP",
    "RECYCLING_DRIVE",
    "CLIMATE_TALK",
    "GREEN_TECH",
    "TREE_PLANTING",
    "SUSTAINABILITY",
    "FREE_ENTRY",
    "PAID_EVENT",
    "ON_CAMPUS",
    "OFF_CAMPUS",
    "VIRTUAL",
    "HYBRID",
    "FOOD_PROVIDED",
    "CERTIFICATE_AVAILABLE",
    "TEAM_EVENT",
    "SOLO_EVENT",
];

pub fn is_valid_tag(tag: &str) -> bool {
    ALL_TAGS.contains(&tag)
}
