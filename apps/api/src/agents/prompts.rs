// All LLM prompt templates for the JobMaster agents.
// Placeholders use `{name}` and are filled by `fill_template` before sending.

// ────────────────────────────────────────────────────────────────────────────
// Job search
// ────────────────────────────────────────────────────────────────────────────

pub const JOB_SEARCH_SYSTEM: &str =
    "You are a job search assistant that generates realistic job postings based on search criteria.";

/// Replace: {job_title}, {criteria}
pub const JOB_SEARCH_PROMPT: &str = r#"Generate 5 realistic job postings for a {job_title} position{criteria}.

For each job, include:
1. Job title ("title")
2. Company name ("company")
3. Location ("location")
4. Job description summary ("description")
5. Required skills ("required_skills", a list)
6. Salary range, if applicable ("salary_range")
7. A fictional but realistic job ID ("id")
8. A fictional but realistic URL ("url")

Format the results as a JSON array of job objects."#;

pub const JOB_MATCH_SYSTEM: &str = "You are a job match analyzer that evaluates how well a \
    candidate's profile matches job requirements.";

/// Replace: {title}, {description}, {required_skills}, {skills}, {work_experience}, {education}
pub const JOB_MATCH_PROMPT: &str = r#"Analyze how well the candidate's profile matches the job requirements.

Job details:
- Title: {title}
- Description: {description}
- Required skills: {required_skills}

Candidate profile:
- Skills: {skills}
- Work experience: {work_experience}
- Education: {education}

Provide an analysis with the following:
1. Overall match percentage (0-100) as "match_percentage"
2. Matching skills as "matching_skills"
3. Missing skills as "missing_skills"
4. Relevant experience as "relevant_experience"
5. Recommendations for the candidate as "recommendations"

Format the results as a JSON object."#;

// ────────────────────────────────────────────────────────────────────────────
// Resume
// ────────────────────────────────────────────────────────────────────────────

pub const RESUME_SYSTEM: &str =
    "You are a resume writing assistant that creates tailored resumes for job applications.";

/// Replace: {title}, {description}, {required_skills}, {basic_info}, {work_experience},
///          {education}, {skills}, {projects}, {certifications}
pub const RESUME_PROMPT: &str = r#"Generate a tailored resume for a job application based on the candidate's profile and job details.

Job details:
- Title: {title}
- Description: {description}
- Required skills: {required_skills}

Candidate profile:
- Basic info: {basic_info}
- Work experience: {work_experience}
- Education: {education}
- Skills: {skills}
- Projects: {projects}
- Certifications: {certifications}

Create a tailored resume that highlights the most relevant experience, skills, and qualifications for this specific job.
The resume should include:
1. Contact information
2. Professional summary tailored to the job
3. Relevant work experience (with achievements and responsibilities that match the job)
4. Education
5. Skills (prioritizing those that match the job requirements)
6. Relevant projects and certifications

Format the results as a JSON object with sections for each part of the resume."#;

pub const RESUME_OPTIMIZE_SYSTEM: &str =
    "You are a resume optimization assistant that improves resumes based on feedback.";

pub const RESUME_FORMAT_SYSTEM: &str = "You are a resume formatting assistant that converts \
    resume data into well-formatted plain text.";

/// Replace: {resume}
pub const RESUME_FORMAT_PROMPT: &str = r#"Format the following resume as plain text that could be copied into a document:

Resume:
{resume}

Please format it professionally with clear section headings, proper spacing, and a clean layout."#;

// ────────────────────────────────────────────────────────────────────────────
// Cover letter
// ────────────────────────────────────────────────────────────────────────────

pub const COVER_LETTER_SYSTEM: &str = "You are a cover letter writing assistant that creates \
    tailored cover letters for job applications.";

/// Replace: {title}, {company}, {description}, {required_skills}, {name}, {email}, {phone},
///          {work_experience}, {skills}, {resume_context}
pub const COVER_LETTER_PROMPT: &str = r#"Generate a tailored cover letter for a job application based on the candidate's profile and job details.

Job details:
- Title: {title}
- Company: {company}
- Description: {description}
- Required skills: {required_skills}

Candidate profile:
- Name: {name}
- Contact: {email}, {phone}
- Relevant work experience: {work_experience}
- Skills: {skills}
{resume_context}
Create a professional, compelling cover letter that:
1. Addresses the hiring manager or company appropriately
2. Expresses interest in the specific role and company
3. Highlights 2-3 most relevant experiences or skills that match the job requirements
4. Explains why the candidate is a good fit for the role
5. Includes a call to action and professional closing

The cover letter should be concise (about 300-400 words) and tailored specifically to this job and company.
Format the results as a JSON object with 'greeting', 'introduction', 'body', 'closing', and 'full_text' fields."#;

pub const COVER_LETTER_OPTIMIZE_SYSTEM: &str = "You are a cover letter optimization assistant \
    that improves cover letters based on feedback.";

pub const COVER_LETTER_FORMAT_SYSTEM: &str = "You are a cover letter formatting assistant that \
    converts cover letter data into well-formatted plain text.";

/// Replace: {cover_letter}
pub const COVER_LETTER_FORMAT_PROMPT: &str = r#"Format the following cover letter as plain text that could be copied into a document:

Cover Letter:
{cover_letter}

Please format it professionally with proper spacing and a clean layout."#;

// ────────────────────────────────────────────────────────────────────────────
// Shared optimization template (resume + cover letter)
// ────────────────────────────────────────────────────────────────────────────

/// Replace: {label}, {document}, {feedback}
pub const OPTIMIZE_PROMPT: &str = r#"Optimize the following {label} based on the provided feedback:

{label}:
{document}

Feedback:
{feedback}

Please provide an optimized version of the {label} that addresses the feedback.
Format the results as a JSON object with the same structure as the original {label}."#;

// ────────────────────────────────────────────────────────────────────────────
// Interview preparation
// ────────────────────────────────────────────────────────────────────────────

pub const COMMON_QUESTIONS_SYSTEM: &str = "You are an interview preparation assistant that \
    generates common interview questions and suggested answers.";

/// Replace: {title}, {company}, {description}, {required_skills}, {skills}, {work_experience}
pub const COMMON_QUESTIONS_PROMPT: &str = r#"Generate 10 common interview questions for a {title} position at {company}, along with suggested answers based on the candidate's profile.

Job details:
- Title: {title}
- Company: {company}
- Description: {description}
- Required skills: {required_skills}

Candidate profile:
- Skills: {skills}
- Work experience: {work_experience}

For each question, provide:
1. The question
2. Why this question might be asked
3. A suggested answer based on the candidate's profile
4. Tips for delivering a strong response

Include a mix of:
- Technical questions related to the required skills
- Behavioral questions
- Situational questions
- Questions about the candidate's experience
- Questions about the company or role

Format the results as a JSON array of question objects."#;

pub const TECHNICAL_QUESTIONS_SYSTEM: &str = "You are an interview preparation assistant that \
    generates technical interview questions and suggested answers.";

/// Replace: {title}, {description}, {required_skills}, {skills}
pub const TECHNICAL_QUESTIONS_PROMPT: &str = r#"Generate 8 technical interview questions for a {title} position, along with suggested answers.

Job details:
- Title: {title}
- Description: {description}
- Required skills: {required_skills}

Candidate skills:
{skills}

For each question, provide:
1. The technical question
2. Why this question is relevant to the role
3. A suggested answer that demonstrates technical knowledge
4. Follow-up questions the interviewer might ask

Focus on technical questions that assess the candidate's knowledge of:
- Technical skills required for the role
- Problem-solving abilities
- Technical concepts and methodologies

Format the results as a JSON array of question objects."#;

pub const COMPANY_RESEARCH_SYSTEM: &str = "You are an interview preparation assistant that \
    generates company research for job interviews.";

/// Replace: {company}
pub const COMPANY_RESEARCH_PROMPT: &str = r#"Generate comprehensive company research for {company} that would be useful for a job interview.

Include:
1. Company overview (history, mission, values)
2. Products or services
3. Recent news or developments
4. Company culture
5. Key competitors
6. Potential interview questions about the company
7. Good questions for the candidate to ask about the company

Format the results as a JSON object with sections for each category of information."#;

pub const INTERVIEW_TIPS_SYSTEM: &str = "You are an interview preparation assistant that \
    generates interview tips for job candidates.";

/// Replace: {title}, {company}
pub const INTERVIEW_TIPS_PROMPT: &str = r#"Generate comprehensive interview tips for a {title} position at {company}.

Include:
1. Before the interview (preparation, research, what to bring)
2. During the interview (body language, communication tips, handling difficult questions)
3. After the interview (follow-up, thank you notes)
4. Common mistakes to avoid
5. Industry-specific interview tips for this role
6. Remote/video interview tips (if applicable)

Format the results as a JSON object with sections for each category of tips."#;

pub const EVALUATE_ANSWER_SYSTEM: &str = "You are an interview coach that evaluates practice \
    answers and provides constructive feedback.";

/// Replace: {title}, {question}, {answer}
pub const EVALUATE_ANSWER_PROMPT: &str = r#"Evaluate the following practice answer for a {title} interview question:

Question: {question}

Answer: {answer}

Provide a detailed evaluation including:
1. Overall rating (1-10)
2. Strengths of the answer
3. Areas for improvement
4. Specific suggestions to make the answer stronger
5. Alternative approaches or points to consider

Format the results as a JSON object with sections for each part of the evaluation."#;

// ────────────────────────────────────────────────────────────────────────────
// Networking
// ────────────────────────────────────────────────────────────────────────────

pub const CONNECTION_MESSAGE_SYSTEM: &str =
    "You are a networking assistant that creates professional connection messages.";

/// Replace: {user_name}, {user_title}, {user_experience}, {contact_name}, {contact_title},
///          {contact_company}, {connection_context}
pub const CONNECTION_MESSAGE_PROMPT: &str = r#"Generate a professional LinkedIn connection message from {user_name} to {contact_name}.

About the sender ({user_name}):
- Current/recent title: {user_title}
- Experience: {user_experience}

About the recipient ({contact_name}):
- Title: {contact_title}
- Company: {contact_company}

Connection context:
{connection_context}

The message should:
1. Be professional and concise (under 300 characters for LinkedIn)
2. Mention a specific reason for connecting
3. Reference a shared interest, background, or the specific job if applicable
4. Be personalized to the recipient
5. Have a clear but non-demanding call to action

Generate three different versions of the message with different approaches:
1. Direct approach (mentioning the job or professional interest clearly)
2. Mutual connection or interest approach (focusing on shared background or interests)
3. Value-offering approach (offering something of value to the recipient)

Format the results as a JSON object with the three message versions."#;

pub const COFFEE_CHAT_SYSTEM: &str = "You are a networking assistant that creates topics and \
    questions for professional coffee chats and informational interviews.";

/// Replace: {contact_name}, {contact_title}, {contact_company}, {context}
pub const COFFEE_CHAT_PROMPT: &str = r#"Generate topics and questions for a coffee chat or informational interview with {contact_name}, who is a {contact_title} at {contact_company}.

Context:
{context}

Generate the following:

1. Introduction topics (3-4 items): professional icebreakers, establishing rapport
2. Career path questions (4-5 items): their career journey, how they got to their current position
3. Industry/company insights (4-5 items): industry trends, company culture and environment
4. Role-specific questions (4-5 items): day-to-day responsibilities, skills important for success
5. Advice-seeking questions (3-4 items): career development advice, industry-specific advice
6. Follow-up and next steps (2-3 items): continuing the relationship, appropriate next steps

For each topic or question, provide:
- The question or topic
- Why this is valuable to discuss
- Potential follow-up questions

Format the results as a JSON object with sections for each category of topics."#;

pub const FOLLOW_UP_SYSTEM: &str = "You are a networking assistant that creates professional \
    follow-up messages after networking meetings.";

/// Replace: {user_name}, {contact_name}, {meeting_notes}
pub const FOLLOW_UP_PROMPT: &str = r#"Generate a professional follow-up email from {user_name} to {contact_name} after a networking meeting or coffee chat.

Meeting notes:
{meeting_notes}

The follow-up email should:
1. Express gratitude for the meeting
2. Reference specific points discussed during the meeting
3. Include any promised follow-up items
4. Suggest next steps or future communication
5. End with a professional closing

Generate two versions of the follow-up email:
1. A standard thank you and follow-up
2. A more detailed follow-up that includes specific action items

Format the results as a JSON object with the two email versions."#;

pub const CONTACT_ANALYSIS_SYSTEM: &str = "You are a networking assistant that analyzes \
    professional profiles to identify networking opportunities.";

/// Replace: {name}, {title}, {company}, {industry}, {background}
pub const CONTACT_ANALYSIS_PROMPT: &str = r#"Analyze the following professional's profile to identify networking opportunities:

Name: {name}
Title: {title}
Company: {company}
Industry: {industry}
Background: {background}

Provide an analysis that includes:
1. Key insights about the professional's background and experience
2. Potential conversation starters or common interests
3. How this contact might be valuable for career development
4. Recommended approach for initial outreach
5. Potential mutual connections or organizations to reference

Format the results as a JSON object with sections for each part of the analysis."#;

/// Fills `{key}` placeholders in one left-to-right pass. Inserted values are
/// never rescanned, and braces that do not name a known key are kept as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
